//! Domain models for guests (VMs and containers) running on a node.

use crate::core::domain::value_object::{NodeId, Percentage, Vmid, serde_helpers};
use serde::{Deserialize, Serialize};

/// Run status of a guest. Unrecognised strings deserialize as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Running,
    Stopped,
    Paused,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Running => "running",
            ResourceStatus::Stopped => "stopped",
            ResourceStatus::Paused => "paused",
            ResourceStatus::Error => "error",
            ResourceStatus::Unknown => "unknown",
        }
    }
}

/// Guest flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Qemu,
    Lxc,
}

/// A VM or container as listed by `/nodes/{id}/resources`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Resource {
    /// Guest identifier.
    pub vmid: Vmid,
    /// Owning node. Some backends omit it in per-node listings.
    #[serde(default, alias = "node_id", skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    /// Guest name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub status: ResourceStatus,
    /// CPU usage (0.0 to 1.0).
    #[serde(default, deserialize_with = "serde_helpers::lenient_f64")]
    pub cpu: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<u32>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub mem: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxmem: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub disk: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxdisk: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
}

impl Resource {
    /// Name for display, falling back to the kind and VMID.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => match self.kind {
                ResourceKind::Qemu => format!("VM {}", self.vmid),
                ResourceKind::Lxc => format!("CT {}", self.vmid),
            },
        }
    }
}

/// One point of a metrics time series.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricSample {
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netout: Option<f64>,
}

/// Live metrics of a guest from `/nodes/{id}/resources/{vmid}/metrics`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ResourceMetrics {
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default, deserialize_with = "serde_helpers::lenient_f64")]
    pub cpu: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<u32>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub mem: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxmem: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub disk: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxdisk: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub netin: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub netout: u64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub uptime: u64,
    /// Recent samples, oldest first.
    #[serde(default)]
    pub history: Vec<MetricSample>,
}

impl ResourceMetrics {
    pub fn cpu_usage(&self) -> Percentage {
        Percentage::from_fraction(self.cpu)
    }

    pub fn memory_usage(&self) -> Percentage {
        Percentage::from_ratio(self.mem as f64, self.maxmem as f64)
    }

    /// CPU history in percent, skipping samples without a CPU reading.
    pub fn cpu_series(&self) -> Vec<f64> {
        self.history
            .iter()
            .filter_map(|s| s.cpu)
            .map(|cpu| cpu * 100.0)
            .collect()
    }

    /// Memory history in bytes, skipping samples without a memory reading.
    pub fn memory_series(&self) -> Vec<f64> {
        self.history.iter().filter_map(|s| s.mem).collect()
    }
}

/// Lifecycle action on a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ResourceAction {
    Start,
    Stop { force: bool },
    Restart { force: bool },
}

impl ResourceAction {
    /// Path segment of the lifecycle endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Start => "start",
            ResourceAction::Stop { .. } => "stop",
            ResourceAction::Restart { .. } => "restart",
        }
    }

    /// Past-tense verb for confirmation messages.
    pub fn past_tense(&self) -> &'static str {
        match self {
            ResourceAction::Start => "started",
            ResourceAction::Stop { .. } => "stopped",
            ResourceAction::Restart { .. } => "restarted",
        }
    }
}

fn default_success() -> bool {
    true
}

/// Result of a mutating call. A 2xx answer without an explicit `success`
/// field counts as success.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OperationResult {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Proxmox task identifier (UPID), when the backend started a task.
    #[serde(default, alias = "upid", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl Default for OperationResult {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
            task_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_deserialize() {
        let resource: Resource = serde_json::from_value(json!({
            "vmid": 101,
            "node": "pve1",
            "name": "web",
            "type": "lxc",
            "status": "running",
            "cpu": 0.1,
            "mem": 512,
            "maxmem": 1024
        }))
        .unwrap();

        assert_eq!(resource.vmid.get(), 101);
        assert_eq!(resource.node.as_ref().map(|n| n.as_str()), Some("pve1"));
        assert_eq!(resource.kind, ResourceKind::Lxc);
        assert_eq!(resource.status, ResourceStatus::Running);
        assert_eq!(resource.display_name(), "web");
    }

    #[test]
    fn test_resource_status_fallback() {
        let resource: Resource =
            serde_json::from_value(json!({"vmid": "200", "status": "migrating"})).unwrap();
        assert_eq!(resource.status, ResourceStatus::Unknown);
        assert_eq!(resource.display_name(), "VM 200");
    }

    #[test]
    fn test_metrics_series() {
        let metrics: ResourceMetrics = serde_json::from_value(json!({
            "status": "running",
            "cpu": 0.5,
            "mem": 256,
            "maxmem": 1024,
            "history": [
                {"time": 1, "cpu": 0.1, "mem": 100.0},
                {"time": 2, "mem": 120.0},
                {"time": 3, "cpu": 0.3}
            ]
        }))
        .unwrap();

        assert_eq!(metrics.cpu_usage().get(), 50.0);
        assert_eq!(metrics.memory_usage().get(), 25.0);
        assert_eq!(metrics.cpu_series().len(), 2);
        assert_eq!(metrics.memory_series(), vec![100.0, 120.0]);
    }

    #[test]
    fn test_operation_result_defaults_to_success() {
        let result: OperationResult =
            serde_json::from_value(json!({"message": "VM started"})).unwrap();
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("VM started"));

        let result: OperationResult =
            serde_json::from_value(json!({"success": false, "upid": "UPID:pve1:..."})).unwrap();
        assert!(!result.success);
        assert!(result.task_id.is_some());
    }

    #[test]
    fn test_resource_action_names() {
        assert_eq!(ResourceAction::Start.as_str(), "start");
        assert_eq!(ResourceAction::Stop { force: true }.as_str(), "stop");
        assert_eq!(ResourceAction::Restart { force: false }.past_tense(), "restarted");
    }
}
