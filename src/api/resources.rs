use super::DashboardApi;
use crate::core::domain::{
    error::DashboardResult,
    model::resource::{OperationResult, Resource, ResourceAction, ResourceMetrics},
    value_object::{NodeId, Vmid},
};
use reqwest::Method;
use serde_json::json;
use tracing::info;

impl DashboardApi {
    /// Lists the guests on a node (`GET /nodes/{id}/resources`).
    ///
    /// Entries without an owning node are attributed to `node_id`.
    pub async fn list_resources(&self, node_id: &NodeId) -> DashboardResult<Vec<Resource>> {
        let options = self.read(format!("/nodes/{}/resources", node_id));
        let mut resources: Vec<Resource> = self
            .fetch_list("list resources", options, "resources")
            .await?;
        for resource in resources.iter_mut().filter(|r| r.node.is_none()) {
            resource.node = Some(node_id.clone());
        }
        Ok(resources)
    }

    /// Fetches live metrics of a guest (`GET /nodes/{id}/resources/{vmid}/metrics`).
    pub async fn resource_metrics(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
    ) -> DashboardResult<ResourceMetrics> {
        let options = self.read(format!("/nodes/{}/resources/{}/metrics", node_id, vmid));
        self.fetch("fetch resource metrics", options, "metrics").await
    }

    /// Starts a guest.
    pub async fn start_resource(&self, node_id: &NodeId, vmid: Vmid) -> DashboardResult<OperationResult> {
        self.resource_action(node_id, vmid, ResourceAction::Start).await
    }

    /// Stops a guest; `force` skips the clean shutdown.
    pub async fn stop_resource(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        force: bool,
    ) -> DashboardResult<OperationResult> {
        self.resource_action(node_id, vmid, ResourceAction::Stop { force })
            .await
    }

    /// Restarts a guest; `force` skips the clean reboot.
    pub async fn restart_resource(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        force: bool,
    ) -> DashboardResult<OperationResult> {
        self.resource_action(node_id, vmid, ResourceAction::Restart { force })
            .await
    }

    /// Runs a lifecycle action (`POST /nodes/{id}/resources/{vmid}/{action}`).
    pub async fn resource_action(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        action: ResourceAction,
    ) -> DashboardResult<OperationResult> {
        let endpoint = format!("/nodes/{}/resources/{}/{}", node_id, vmid, action.as_str());
        let mut options = self.write(Method::POST, endpoint);
        match action {
            ResourceAction::Start => {}
            ResourceAction::Stop { force } | ResourceAction::Restart { force } => {
                options = options.json(&json!({ "force": force }))?;
            }
        }

        let operation = format!("{} resource", action.as_str());
        let result = self.fetch_result(&operation, options).await?;
        info!(node = %node_id, vmid = vmid.get(), action = action.as_str(), "resource action completed");
        Ok(result)
    }
}
