//! Liveness and connection-test payloads.

use serde::{Deserialize, Serialize};

/// Answer of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    /// Plain-text health answers ("OK") arrive wrapped as `{"message": ...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Backend uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

impl HealthStatus {
    /// The reported state, falling back to the plain-text message.
    pub fn state(&self) -> &str {
        if self.status.is_empty() {
            self.message.as_deref().unwrap_or_default().trim()
        } else {
            &self.status
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.state().to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

/// Answer of the connection-test endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Proxmox VE version reported by the tested node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_value(json!({"status": "OK"})).unwrap();
        assert!(health.is_healthy());
        let health: HealthStatus = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert!(health.is_healthy());
        let health: HealthStatus = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert!(!health.is_healthy());
    }

    #[test]
    fn test_connection_test_result() {
        let result: ConnectionTestResult =
            serde_json::from_value(json!({"success": true, "version": "8.2.4"})).unwrap();
        assert!(result.success);
        assert_eq!(result.version.as_deref(), Some("8.2.4"));
    }
}
