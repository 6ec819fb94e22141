use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NODE_ID_LENGTH: usize = 64;

/// A validated node identifier, safe to splice into an endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "super::serde_helpers::StringOrNumber", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Creates a validated node identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_node_id(&id)?;
        Ok(Self(id))
    }

    /// Creates a node identifier without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates a node identifier.
fn validate_node_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::field("node_id", "Node id cannot be empty"));
    }
    if id.len() > MAX_NODE_ID_LENGTH {
        return Err(ValidationError::field(
            "node_id",
            format!("Node id exceeds maximum of {} characters", MAX_NODE_ID_LENGTH),
        ));
    }
    if id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(ValidationError::Format(format!(
            "Node id '{}' contains characters not allowed in a path segment",
            id
        )));
    }
    Ok(())
}

impl TryFrom<super::serde_helpers::StringOrNumber> for NodeId {
    type Error = ValidationError;

    fn try_from(value: super::serde_helpers::StringOrNumber) -> Result<Self, Self::Error> {
        NodeId::new(value.into_string())
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
