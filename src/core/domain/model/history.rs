//! Operation history entries and the filters accepted by `/history`.

use crate::core::domain::value_object::{NodeId, Vmid, serde_helpers::StringOrNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A recorded operation (node added, VM started, ...).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmid: Option<Vmid>,
    pub operation: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into_string())
}

/// Query-string filters for the history endpoints. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub node_id: Option<NodeId>,
    pub vmid: Option<Vmid>,
    pub operation: Option<String>,
    pub status: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn vmid(mut self, vmid: Vmid) -> Self {
        self.vmid = Some(vmid);
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Key/value pairs in a stable order, ready for the query string.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(node_id) = &self.node_id {
            pairs.push(("node_id".to_string(), node_id.to_string()));
        }
        if let Some(vmid) = &self.vmid {
            pairs.push(("vmid".to_string(), vmid.to_string()));
        }
        if let Some(operation) = &self.operation {
            pairs.push(("operation".to_string(), operation.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(since) = &self.since {
            pairs.push(("since".to_string(), since.to_rfc3339()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_entry_deserialize() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 17,
            "timestamp": "2026-01-02T03:04:05Z",
            "node_id": "pve1",
            "vmid": 101,
            "operation": "start",
            "status": "success"
        }))
        .unwrap();
        assert_eq!(entry.id, "17");
        assert_eq!(entry.vmid.map(|v| v.get()), Some(101));
        assert!(entry.message.is_none());
    }

    #[test]
    fn test_empty_filter_has_no_pairs() {
        assert!(HistoryFilter::new().to_query_pairs().is_empty());
    }

    #[test]
    fn test_filter_pairs_in_order() {
        let filter = HistoryFilter::new()
            .vmid(Vmid::new_unchecked(101))
            .operation("stop")
            .limit(25)
            .offset(50);
        assert_eq!(
            filter.to_query_pairs(),
            vec![
                ("vmid".to_string(), "101".to_string()),
                ("operation".to_string(), "stop".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("offset".to_string(), "50".to_string()),
            ]
        );
    }
}
