use super::DashboardApi;
use crate::core::domain::{
    error::DashboardResult,
    model::{
        health::ConnectionTestResult,
        node::{Node, NodeConfig},
        resource::OperationResult,
    },
    value_object::NodeId,
};
use reqwest::Method;
use tracing::info;

impl DashboardApi {
    /// Lists all configured nodes (`GET /nodes`).
    pub async fn list_nodes(&self) -> DashboardResult<Vec<Node>> {
        self.fetch_list("list nodes", self.read("/nodes".to_string()), "nodes")
            .await
    }

    /// Registers a new node (`POST /nodes`).
    pub async fn add_node(&self, config: &NodeConfig) -> DashboardResult<Node> {
        config.validate()?;
        let options = self.write(Method::POST, "/nodes".to_string()).json(config)?;
        let node: Node = self.fetch("add node", options, "node").await?;
        info!(node = %node.id, "node added");
        Ok(node)
    }

    /// Replaces a node's connection settings (`PUT /nodes/{id}`).
    pub async fn update_node(&self, node_id: &NodeId, config: &NodeConfig) -> DashboardResult<Node> {
        config.validate()?;
        let options = self
            .write(Method::PUT, format!("/nodes/{}", node_id))
            .json(config)?;
        self.fetch("update node", options, "node").await
    }

    /// Removes a node (`DELETE /nodes/{id}`).
    pub async fn delete_node(&self, node_id: &NodeId) -> DashboardResult<OperationResult> {
        let options = self.write(Method::DELETE, format!("/nodes/{}", node_id));
        let result = self.fetch_result("delete node", options).await?;
        info!(node = %node_id, "node deleted");
        Ok(result)
    }

    /// Tests the connection of a saved node (`POST /nodes/{id}/test`).
    pub async fn test_node(&self, node_id: &NodeId) -> DashboardResult<ConnectionTestResult> {
        let options = self.write(Method::POST, format!("/nodes/{}/test", node_id));
        self.fetch("test node connection", options, "result").await
    }

    /// Tests connection settings that have not been saved yet (`POST /test-connection`).
    pub async fn test_connection(&self, config: &NodeConfig) -> DashboardResult<ConnectionTestResult> {
        config.validate()?;
        let options = self
            .write(Method::POST, "/test-connection".to_string())
            .json(config)?;
        self.fetch("test connection", options, "result").await
    }
}
