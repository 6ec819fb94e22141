//! Client-side layer of a Proxmox management dashboard.
//!
//! - [`DashboardApi`]: typed REST calls with per-request timeouts and
//!   retry with linear backoff for reads
//! - [`NotificationManager`]: toast notifications with per-toast timers
//! - [`widget`]: progress bars, gauges, metric cards and sparklines built as
//!   escaped element trees
//! - [`Visualizer`] and [`DashboardController`]: ordered rendering of fetched
//!   data plus the events page components listen to

pub mod api;
pub mod controller;
mod core;
pub mod notification;
pub mod visualizer;
pub mod widget;

pub use crate::api::{DashboardApi, DashboardBackend};
pub use crate::controller::{DashboardController, EventBus};
pub use crate::core::domain::error::{DashboardError, DashboardResult, ErrorCode, ValidationError};
pub use crate::core::domain::model::{
    event::DashboardEvent,
    health::{ConnectionTestResult, HealthStatus},
    history::{HistoryEntry, HistoryFilter},
    node::{Node, NodeConfig, NodeStatus},
    notification::{Notification, Severity},
    resource::{
        MetricSample, OperationResult, Resource, ResourceAction, ResourceKind, ResourceMetrics,
        ResourceStatus,
    },
};
pub use crate::core::domain::value_object::{ApiBaseUrl, NodeId, NotificationId, Percentage, Vmid};
pub use crate::core::infrastructure::{
    api_client::ApiClient,
    config::{DashboardConfig, DashboardConfigBuilder, NotificationConfig, RateLimitConfig},
    request::RequestOptions,
};
pub use crate::notification::{DismissReason, NotificationManager, ToastSink};
pub use crate::visualizer::Visualizer;

use std::sync::Arc;

/// The dashboard's shared services, wired once at startup.
///
/// # Examples
///
/// ```no_run
/// use pve_dashboard::{DashboardConfig, DashboardResult, DashboardServices};
///
/// #[tokio::main]
/// async fn main() -> DashboardResult<()> {
///     let config = DashboardConfig::builder()
///         .base_url("http://localhost:3000/api")
///         .build()?;
///     let services = DashboardServices::new(config)?;
///
///     let controller = services.controller();
///     let nodes = controller.refresh_nodes().await?;
///     println!("{} nodes", nodes.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DashboardServices {
    pub api: Arc<DashboardApi>,
    pub notifications: NotificationManager,
    pub visualizer: Arc<Visualizer>,
    pub events: EventBus,
}

impl DashboardServices {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        Self::with_toast_sink(config, None)
    }

    /// Like [`new`](Self::new), forwarding toast changes to `sink`.
    pub fn with_toast_sink(
        config: DashboardConfig,
        sink: Option<Arc<dyn ToastSink>>,
    ) -> DashboardResult<Self> {
        let notifications = NotificationManager::with_sink(config.notifications, sink);
        let api = DashboardApi::new(config)?;
        Ok(Self {
            api: Arc::new(api),
            notifications,
            visualizer: Arc::new(Visualizer::new()),
            events: EventBus::default(),
        })
    }

    pub fn controller(&self) -> DashboardController {
        DashboardController::new(
            self.api.clone(),
            self.visualizer.clone(),
            self.notifications.clone(),
            self.events.clone(),
        )
    }
}

#[cfg(test)]
mod tests;
