use super::DashboardApi;
use crate::core::domain::{error::DashboardResult, model::health::HealthStatus};

impl DashboardApi {
    /// Liveness check (`GET /health`).
    pub async fn health(&self) -> DashboardResult<HealthStatus> {
        self.fetch("check backend health", self.read("/health".to_string()), "health")
            .await
    }
}
