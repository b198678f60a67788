//! Wire records for the flow JSON handed over by the editor and importers.
//!
//! These types are the serde target for `{ nodes, connections }`. The node
//! `data` payload stays untyped here; `component.rs` decodes it per kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// TOP-LEVEL INPUT
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowInput {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    #[serde(default)]
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default)]
    pub from_output: Option<String>,
    #[serde(default)]
    pub to_input: Option<String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, data: Value) -> Self {
        NodeRecord {
            id: id.into(),
            node_type: node_type.into(),
            data,
        }
    }
}

impl ConnectionRecord {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        ConnectionRecord {
            id: id.into(),
            from_node_id: from.into(),
            to_node_id: to.into(),
            from_output: None,
            to_input: None,
        }
    }
}

/// `"connections": null` is accepted the same as a missing field.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
