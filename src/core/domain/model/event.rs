//! Cross-component dashboard events.
//!
//! Each variant serializes as `{"type": <event name>, "detail": {...}}`, the
//! shape the page-level listeners expect.

use crate::core::domain::{
    model::{node::Node, resource::ResourceAction},
    value_object::{NodeId, Vmid},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum DashboardEvent {
    /// The node list finished loading.
    #[serde(rename = "nodesLoaded")]
    NodesLoaded { nodes: Vec<Node> },
    /// A single node changed (edited, re-tested, refreshed).
    #[serde(rename = "nodeUpdated")]
    NodeUpdated { node: Node },
    /// The active dashboard tab changed.
    #[serde(rename = "tabchange")]
    TabChanged { tab: String },
    /// The resource section of a node was opened.
    #[serde(rename = "resourceSectionShown")]
    ResourceSectionShown {
        #[serde(rename = "nodeId")]
        node_id: NodeId,
    },
    /// A start/stop/restart call finished successfully.
    #[serde(rename = "resourceOperationCompleted")]
    ResourceOperationCompleted {
        #[serde(rename = "nodeId")]
        node_id: NodeId,
        vmid: Vmid,
        action: &'static str,
    },
}

impl DashboardEvent {
    /// The event name listeners subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::NodesLoaded { .. } => "nodesLoaded",
            DashboardEvent::NodeUpdated { .. } => "nodeUpdated",
            DashboardEvent::TabChanged { .. } => "tabchange",
            DashboardEvent::ResourceSectionShown { .. } => "resourceSectionShown",
            DashboardEvent::ResourceOperationCompleted { .. } => "resourceOperationCompleted",
        }
    }

    pub(crate) fn operation_completed(node_id: NodeId, vmid: Vmid, action: ResourceAction) -> Self {
        DashboardEvent::ResourceOperationCompleted {
            node_id,
            vmid,
            action: action.as_str(),
        }
    }
}
