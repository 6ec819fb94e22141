//! Typed operations against the dashboard backend's REST surface.
//!
//! [`DashboardApi`] maps each backend route to one method. Read operations
//! (GET) carry the configured retry budget, mutating calls carry none.
//! Endpoint groups live in their own files as inherent `impl` blocks.

mod envelope;
mod health;
mod history;
mod nodes;
mod resources;

use crate::core::{
    domain::{
        error::DashboardResult,
        model::{
            health::HealthStatus,
            node::{Node, NodeConfig},
            resource::{OperationResult, Resource, ResourceAction, ResourceMetrics},
        },
        value_object::{NodeId, Vmid},
    },
    infrastructure::{
        api_client::{ApiClient, decode},
        config::DashboardConfig,
        request::RequestOptions,
    },
};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) use envelope::{unwrap_envelope, unwrap_list};

/// Client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    /// Builds the API on top of a fresh HTTP client.
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    /// Wraps an existing client.
    pub fn from_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// GET with the configured read retry budget.
    fn read(&self, endpoint: String) -> RequestOptions {
        let config = self.client.config();
        RequestOptions::get(endpoint)
            .timeout(config.timeout)
            .retries(config.read_retries)
    }

    /// Mutating call: configured timeout, no retries.
    fn write(&self, method: Method, endpoint: String) -> RequestOptions {
        RequestOptions::new(method, endpoint).timeout(self.client.config().timeout)
    }

    async fn fetch<T>(&self, operation: &str, options: RequestOptions, key: &str) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.client.request_value(operation, &options).await?;
        decode(operation, &options.endpoint, unwrap_envelope(value, key))
    }

    async fn fetch_list<T>(
        &self,
        operation: &str,
        options: RequestOptions,
        key: &str,
    ) -> DashboardResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let value = self.client.request_value(operation, &options).await?;
        decode(operation, &options.endpoint, unwrap_list(value, key))
    }

    async fn fetch_result(
        &self,
        operation: &str,
        options: RequestOptions,
    ) -> DashboardResult<OperationResult> {
        let value = self.client.request_value(operation, &options).await?;
        operation_result(operation, &options.endpoint, value)
    }
}

/// Decodes the answer of a mutating call.
///
/// An empty body counts as success, and a bare `{"data": "UPID:..."}` is read
/// as the id of the started task.
fn operation_result(operation: &str, endpoint: &str, value: Value) -> DashboardResult<OperationResult> {
    if let Value::Object(map) = &value {
        if map.contains_key("success") {
            return decode(operation, endpoint, value);
        }
        if let Some(Value::String(task)) = map.get("data") {
            return Ok(OperationResult {
                task_id: Some(task.clone()),
                ..Default::default()
            });
        }
    }
    match unwrap_envelope(value, "data") {
        Value::Null => Ok(OperationResult::default()),
        other => decode(operation, endpoint, other),
    }
}

/// The backend operations the dashboard controller depends on.
///
/// Implemented by [`DashboardApi`]; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn list_nodes(&self) -> DashboardResult<Vec<Node>>;

    async fn update_node(&self, node_id: &NodeId, config: &NodeConfig) -> DashboardResult<Node>;

    async fn list_resources(&self, node_id: &NodeId) -> DashboardResult<Vec<Resource>>;

    async fn resource_metrics(&self, node_id: &NodeId, vmid: Vmid)
    -> DashboardResult<ResourceMetrics>;

    async fn resource_action(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        action: ResourceAction,
    ) -> DashboardResult<OperationResult>;

    async fn health(&self) -> DashboardResult<HealthStatus>;
}

#[async_trait]
impl DashboardBackend for DashboardApi {
    async fn list_nodes(&self) -> DashboardResult<Vec<Node>> {
        DashboardApi::list_nodes(self).await
    }

    async fn update_node(&self, node_id: &NodeId, config: &NodeConfig) -> DashboardResult<Node> {
        DashboardApi::update_node(self, node_id, config).await
    }

    async fn list_resources(&self, node_id: &NodeId) -> DashboardResult<Vec<Resource>> {
        DashboardApi::list_resources(self, node_id).await
    }

    async fn resource_metrics(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
    ) -> DashboardResult<ResourceMetrics> {
        DashboardApi::resource_metrics(self, node_id, vmid).await
    }

    async fn resource_action(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        action: ResourceAction,
    ) -> DashboardResult<OperationResult> {
        DashboardApi::resource_action(self, node_id, vmid, action).await
    }

    async fn health(&self) -> DashboardResult<HealthStatus> {
        DashboardApi::health(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(value: Value) -> OperationResult {
        operation_result("start resource", "/x", value).unwrap()
    }

    #[test]
    fn test_empty_body_is_success() {
        assert_eq!(result(Value::Null), OperationResult::default());
    }

    #[test]
    fn test_explicit_failure_is_kept() {
        let r = result(json!({"success": false, "message": "locked", "data": {"x": 1}}));
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("locked"));
    }

    #[test]
    fn test_task_id_from_data_string() {
        let r = result(json!({"data": "UPID:pve1:0001:start"}));
        assert!(r.success);
        assert_eq!(r.task_id.as_deref(), Some("UPID:pve1:0001:start"));
    }

    #[test]
    fn test_wrapped_result_and_plain_message() {
        let r = result(json!({"data": {"upid": "UPID:1"}}));
        assert_eq!(r.task_id.as_deref(), Some("UPID:1"));
        let r = result(json!({"message": "queued"}));
        assert!(r.success);
        assert_eq!(r.message.as_deref(), Some("queued"));
    }
}
