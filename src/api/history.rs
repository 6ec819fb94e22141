use super::DashboardApi;
use crate::core::domain::{
    error::DashboardResult,
    model::history::{HistoryEntry, HistoryFilter},
    value_object::NodeId,
};

impl DashboardApi {
    /// Operation history across all nodes (`GET /history?...`).
    pub async fn history(&self, filter: &HistoryFilter) -> DashboardResult<Vec<HistoryEntry>> {
        let options = self
            .read("/history".to_string())
            .query(filter.to_query_pairs());
        self.fetch_list("load history", options, "history").await
    }

    /// Operation history of one node (`GET /nodes/{id}/history?...`).
    ///
    /// The node is already part of the path, so a `node_id` in the filter is ignored.
    pub async fn node_history(
        &self,
        node_id: &NodeId,
        filter: &HistoryFilter,
    ) -> DashboardResult<Vec<HistoryEntry>> {
        let query = filter
            .to_query_pairs()
            .into_iter()
            .filter(|(key, _)| key != "node_id")
            .collect();
        let options = self
            .read(format!("/nodes/{}/history", node_id))
            .query(query);
        self.fetch_list("load node history", options, "history").await
    }
}
