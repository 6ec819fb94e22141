//! Domain models for managed nodes, as served by the dashboard backend's `/nodes` endpoints.

use crate::core::domain::{
    error::ValidationError,
    value_object::{NodeId, Percentage, serde_helpers},
};
use serde::{Deserialize, Serialize};

/// Connectivity status of a node. Any status string the client does not
/// know deserializes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Online => "online",
            NodeStatus::Offline => "offline",
            NodeStatus::Unknown => "unknown",
        }
    }
}

/// A managed virtualization host.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Node {
    /// Backend identifier of the node.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Current connectivity status.
    #[serde(default)]
    pub status: NodeStatus,
    /// Address of the Proxmox API host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port of the Proxmox API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// CPU usage (0.0 to 1.0).
    #[serde(default, deserialize_with = "serde_helpers::lenient_f64")]
    pub cpu: f64,
    /// Number of logical CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<u32>,
    /// Memory usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub mem: u64,
    /// Memory capacity in bytes.
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxmem: u64,
    /// Root disk usage in bytes.
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub disk: u64,
    /// Root disk capacity in bytes.
    #[serde(default, deserialize_with = "serde_helpers::lenient_u64")]
    pub maxdisk: u64,
    /// Uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
}

impl Node {
    pub fn is_online(&self) -> bool {
        self.status == NodeStatus::Online
    }

    pub fn cpu_usage(&self) -> Percentage {
        Percentage::from_fraction(self.cpu)
    }

    pub fn memory_usage(&self) -> Percentage {
        Percentage::from_ratio(self.mem as f64, self.maxmem as f64)
    }

    pub fn disk_usage(&self) -> Percentage {
        Percentage::from_ratio(self.disk as f64, self.maxdisk as f64)
    }
}

fn default_port() -> u16 {
    8006
}

fn default_realm() -> String {
    "pam".to_string()
}

/// Connection settings sent when adding, updating or testing a node.
///
/// Either `password` or both `token_id` and `token_secret` must be set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeConfig {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    #[serde(default)]
    pub verify_ssl: bool,
}

impl NodeConfig {
    /// Creates a password-authenticated configuration with default port and realm.
    pub fn with_password(
        name: impl Into<String>,
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: default_port(),
            username: username.into(),
            realm: default_realm(),
            password: Some(password.into()),
            token_id: None,
            token_secret: None,
            verify_ssl: false,
        }
    }

    /// Checks the configuration before it is sent to the backend.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "Name is required"));
        }
        if self.host.trim().is_empty() {
            return Err(ValidationError::field("host", "Host is required"));
        }
        if self.host.contains(char::is_whitespace) {
            return Err(ValidationError::Format(
                "Host cannot contain whitespace".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ValidationError::field("port", "Port cannot be 0"));
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::field("username", "Username is required"));
        }

        let has_password = self.password.as_deref().is_some_and(|p| !p.is_empty());
        let has_token = self.token_id.as_deref().is_some_and(|t| !t.is_empty())
            && self.token_secret.as_deref().is_some_and(|s| !s.is_empty());
        if !has_password && !has_token {
            return Err(ValidationError::ConstraintViolation(
                "Either a password or an API token id and secret is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_deserialize_full() {
        let node: Node = serde_json::from_value(json!({
            "id": "pve1",
            "name": "Primary",
            "status": "online",
            "host": "10.0.0.2",
            "port": 8006,
            "cpu": 0.25,
            "maxcpu": 8,
            "mem": 4294967296_u64,
            "maxmem": 17179869184_u64,
            "disk": 50,
            "maxdisk": 200,
            "uptime": 3600
        }))
        .unwrap();

        assert_eq!(node.id.as_str(), "pve1");
        assert!(node.is_online());
        assert_eq!(node.cpu_usage().get(), 25.0);
        assert_eq!(node.memory_usage().get(), 25.0);
        assert_eq!(node.disk_usage().get(), 25.0);
    }

    #[test]
    fn test_node_unknown_status_and_missing_metrics() {
        let node: Node = serde_json::from_value(json!({
            "id": 3,
            "name": "Lab",
            "status": "maintenance"
        }))
        .unwrap();

        assert_eq!(node.id.as_str(), "3");
        assert_eq!(node.status, NodeStatus::Unknown);
        assert_eq!(node.memory_usage(), Percentage::ZERO);
        assert_eq!(node.maxmem, 0);
    }

    #[test]
    fn test_node_config_validation() {
        let config = NodeConfig::with_password("Primary", "10.0.0.2", "root", "secret");
        assert!(config.validate().is_ok());

        let mut missing_host = config.clone();
        missing_host.host = " ".to_string();
        assert!(missing_host.validate().is_err());

        let mut zero_port = config.clone();
        zero_port.port = 0;
        assert!(zero_port.validate().is_err());

        let mut no_credentials = config.clone();
        no_credentials.password = None;
        assert!(no_credentials.validate().is_err());

        no_credentials.token_id = Some("root@pam!dash".to_string());
        assert!(no_credentials.validate().is_err());
        no_credentials.token_secret = Some("uuid-secret".to_string());
        assert!(no_credentials.validate().is_ok());
    }

    #[test]
    fn test_node_config_defaults_and_skips() {
        let config: NodeConfig = serde_json::from_value(json!({
            "name": "Lab",
            "host": "lab.local",
            "username": "root",
            "password": "pw"
        }))
        .unwrap();
        assert_eq!(config.port, 8006);
        assert_eq!(config.realm, "pam");

        let body = serde_json::to_value(&config).unwrap();
        assert!(body.get("token_id").is_none());
        assert_eq!(body["verify_ssl"], false);
    }
}
