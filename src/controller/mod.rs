//! Page-level orchestration: fetch through the backend, render through the
//! visualizer, report through toasts and events.

mod events;

pub use events::EventBus;

use crate::api::DashboardBackend;
use crate::core::domain::{
    error::{DashboardError, DashboardResult},
    model::{
        event::DashboardEvent,
        node::{Node, NodeConfig},
        resource::{OperationResult, Resource, ResourceAction, ResourceMetrics},
    },
    value_object::{NodeId, Vmid},
};
use crate::notification::NotificationManager;
use crate::visualizer::{NODES_TARGET, UpdateOutcome, Visualizer, resource_target, resource_updates};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lower bound of the polling period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Drives the dashboard views.
///
/// Every failed backend call is shown as an error toast and also returned to
/// the caller, so nothing fails silently.
#[derive(Clone)]
pub struct DashboardController {
    backend: Arc<dyn DashboardBackend>,
    visualizer: Arc<Visualizer>,
    notifications: NotificationManager,
    events: EventBus,
}

impl DashboardController {
    pub fn new(
        backend: Arc<dyn DashboardBackend>,
        visualizer: Arc<Visualizer>,
        notifications: NotificationManager,
        events: EventBus,
    ) -> Self {
        Self {
            backend,
            visualizer,
            notifications,
            events,
        }
    }

    pub fn visualizer(&self) -> &Arc<Visualizer> {
        &self.visualizer
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Loads the node list and renders every node card.
    ///
    /// `nodesLoaded` is emitted only when this response was the newest one
    /// rendered.
    pub async fn refresh_nodes(&self) -> DashboardResult<Vec<Node>> {
        let sequence = self.visualizer.begin(NODES_TARGET);
        let nodes = self.backend.list_nodes().await.map_err(|e| self.report(e))?;

        match self.visualizer.apply_nodes(sequence, &nodes) {
            UpdateOutcome::Applied { .. } => {
                debug!(count = nodes.len(), "Rendered node list");
                self.events.emit(DashboardEvent::NodesLoaded {
                    nodes: nodes.clone(),
                });
            }
            UpdateOutcome::Stale => debug!("Node list superseded by a newer refresh"),
        }
        Ok(nodes)
    }

    /// Saves a node's connection settings and re-renders its card.
    pub async fn update_node(&self, node_id: &NodeId, config: &NodeConfig) -> DashboardResult<Node> {
        config.validate().map_err(|e| self.report(e.into()))?;
        let node = self
            .backend
            .update_node(node_id, config)
            .await
            .map_err(|e| self.report(e))?;

        self.visualizer.apply_node(&node);
        self.notifications
            .success(format!("Node {} updated successfully", node.name));
        self.events
            .emit(DashboardEvent::NodeUpdated { node: node.clone() });
        Ok(node)
    }

    /// Opens the resource section of a node.
    pub async fn show_resources(&self, node_id: &NodeId) -> DashboardResult<Vec<Resource>> {
        let resources = self
            .backend
            .list_resources(node_id)
            .await
            .map_err(|e| self.report(e))?;
        self.events.emit(DashboardEvent::ResourceSectionShown {
            node_id: node_id.clone(),
        });
        Ok(resources)
    }

    /// Fetches and renders the live metrics of one guest.
    pub async fn refresh_resource_metrics(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
    ) -> DashboardResult<ResourceMetrics> {
        let target = resource_target(node_id, vmid);
        let sequence = self.visualizer.begin(&target);
        let metrics = self
            .backend
            .resource_metrics(node_id, vmid)
            .await
            .map_err(|e| self.report(e))?;
        self.visualizer
            .apply(&target, sequence, &resource_updates(&metrics));
        Ok(metrics)
    }

    /// Runs a lifecycle action and reports its outcome as a toast.
    ///
    /// A 2xx answer with `success: false` is returned as-is, shown as an error
    /// toast, and does not emit `resourceOperationCompleted`.
    pub async fn run_resource_action(
        &self,
        node_id: &NodeId,
        vmid: Vmid,
        action: ResourceAction,
    ) -> DashboardResult<OperationResult> {
        let result = self
            .backend
            .resource_action(node_id, vmid, action)
            .await
            .map_err(|e| self.report(e))?;

        if result.success {
            self.notifications
                .success(format!("Resource {} {} successfully", vmid, action.past_tense()));
            self.events
                .emit(DashboardEvent::operation_completed(node_id.clone(), vmid, action));
        } else {
            let reason = result
                .message
                .clone()
                .unwrap_or_else(|| "the backend reported a failure".to_string());
            warn!(node = %node_id, vmid = vmid.get(), action = action.as_str(), %reason, "Resource action rejected");
            self.notifications.error(format!(
                "Failed to {} resource {}: {}",
                action.as_str(),
                vmid,
                reason
            ));
        }
        Ok(result)
    }

    pub fn change_tab(&self, tab: impl Into<String>) {
        self.events.emit(DashboardEvent::TabChanged { tab: tab.into() });
    }

    /// Refreshes the node list every `interval` until the handle is aborted.
    ///
    /// Failures are reported like any other refresh and do not stop polling.
    /// Periods below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn spawn_polling(&self, interval: Duration) -> JoinHandle<()> {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let controller = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!(interval_ms = interval.as_millis() as u64, "Started node polling");
            loop {
                ticker.tick().await;
                if let Err(err) = controller.refresh_nodes().await {
                    debug!(error = %err, "Polling refresh failed");
                }
            }
        })
    }

    fn report(&self, err: DashboardError) -> DashboardError {
        warn!(
            code = err.code().as_str(),
            operation = err.operation().unwrap_or("-"),
            error = %err,
            "Dashboard operation failed"
        );
        self.notifications.show_error(&err);
        err
    }
}
