//! petgraph-based directed graph of the decoded flow.
//!
//! Building never fails: unknown kinds, duplicate ids and broken connections
//! are dropped and reported as `GraphDiagnostic`s, which end up as diagnostic
//! steps at the top of the compiled scenario.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::TRACING_TARGET;
use super::component::{Component, ComponentKind};
use super::types::{ConnectionRecord, NodeRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub connection_id: String,
    pub from_output: Option<String>,
    pub to_input: Option<String>,
}

/// A node's decoded payload. A payload that does not fit its kind's shape is
/// kept so the node still takes its place in the step order.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Valid(Component),
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: ComponentKind,
    pub payload: Payload,
}

/// A graph-level problem that caused a node or connection to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDiagnostic {
    pub code: &'static str,
    pub subject_id: String,
    pub message: String,
}

pub struct FlowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
    /// Accepted nodes in input order. `graph` node weights index into this by position.
    pub nodes: Vec<Node>,
    pub diagnostics: Vec<GraphDiagnostic>,
}

impl FlowGraph {
    pub fn build(records: &[NodeRecord], connections: &[ConnectionRecord]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut nodes = Vec::with_capacity(records.len());
        let mut diagnostics = Vec::new();

        // Add all nodes
        for record in records {
            if let Some(diagnostic) = admit_node(record, &node_indices) {
                tracing::warn!(
                    target: TRACING_TARGET,
                    node_id = %record.id,
                    node_type = %record.node_type,
                    code = diagnostic.code,
                    "Dropping node"
                );
                diagnostics.push(diagnostic);
                continue;
            }

            // admit_node has already checked the type name
            let Some(kind) = ComponentKind::from_type_name(&record.node_type) else {
                continue;
            };
            let payload = match Component::decode(kind, &record.data) {
                Ok(component) => Payload::Valid(component),
                Err(e) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        node_id = %record.id,
                        error = %e,
                        "Node payload does not match its kind"
                    );
                    Payload::Malformed {
                        reason: e.to_string(),
                    }
                }
            };

            let idx = graph.add_node(record.id.clone());
            node_indices.insert(record.id.clone(), idx);
            nodes.push(Node {
                id: record.id.clone(),
                kind,
                payload,
            });
        }

        // Add all edges
        let mut connection_ids: HashSet<&str> = HashSet::new();
        for connection in connections {
            let source_idx = node_indices.get(&connection.from_node_id);
            let target_idx = node_indices.get(&connection.to_node_id);
            // Connection ids are optional; only a repeated non-blank id is a duplicate.
            let duplicate = !connection.id.trim().is_empty()
                && !connection_ids.insert(connection.id.as_str());

            let rejected = match (source_idx, target_idx) {
                _ if duplicate => Some(GraphDiagnostic {
                    code: "G005",
                    subject_id: connection.id.clone(),
                    message: format!(
                        "Duplicate connection id '{}' ({} -> {})",
                        connection.id, connection.from_node_id, connection.to_node_id
                    ),
                }),
                (Some(&s), Some(&t)) if s == t => Some(GraphDiagnostic {
                    code: "G004",
                    subject_id: connection.id.clone(),
                    message: format!(
                        "Connection '{}' connects node '{}' to itself",
                        connection.id, connection.from_node_id
                    ),
                }),
                (Some(&s), Some(&t)) => {
                    graph.add_edge(
                        s,
                        t,
                        EdgeLabel {
                            connection_id: connection.id.clone(),
                            from_output: connection.from_output.clone(),
                            to_input: connection.to_input.clone(),
                        },
                    );
                    None
                }
                (None, _) => Some(GraphDiagnostic {
                    code: "G003",
                    subject_id: connection.id.clone(),
                    message: format!(
                        "Connection '{}' references unknown source node '{}'",
                        connection.id, connection.from_node_id
                    ),
                }),
                (_, None) => Some(GraphDiagnostic {
                    code: "G003",
                    subject_id: connection.id.clone(),
                    message: format!(
                        "Connection '{}' references unknown target node '{}'",
                        connection.id, connection.to_node_id
                    ),
                }),
            };

            if let Some(diagnostic) = rejected {
                tracing::warn!(
                    target: TRACING_TARGET,
                    connection_id = %connection.id,
                    code = diagnostic.code,
                    "Dropping connection"
                );
                diagnostics.push(diagnostic);
            }
        }

        FlowGraph {
            graph,
            node_indices,
            nodes,
            diagnostics,
        }
    }

    /// Source node ids of connections terminating at `node_id`, in connection order.
    pub fn dependencies(&self, node_id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        let mut incoming: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .map(|e| (e.id(), e.source()))
            .collect();
        incoming.sort_by_key(|(edge, _)| edge.index());
        incoming
            .into_iter()
            .map(|(_, source)| self.graph[source].as_str())
            .collect()
    }
}

fn admit_node(record: &NodeRecord, known: &HashMap<String, NodeIndex>) -> Option<GraphDiagnostic> {
    if record.id.trim().is_empty() {
        return Some(GraphDiagnostic {
            code: "G001",
            subject_id: record.id.clone(),
            message: format!("Node of type '{}' has an empty id", record.node_type),
        });
    }
    if known.contains_key(&record.id) {
        return Some(GraphDiagnostic {
            code: "G001",
            subject_id: record.id.clone(),
            message: format!("Duplicate node id '{}'", record.id),
        });
    }
    if ComponentKind::from_type_name(&record.node_type).is_none() {
        return Some(GraphDiagnostic {
            code: "G002",
            subject_id: record.id.clone(),
            message: format!("Unknown component type '{}'", record.node_type),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, ty: &str) -> NodeRecord {
        NodeRecord::new(id, ty, json!({}))
    }

    #[test]
    fn drops_unknown_and_duplicate_nodes() {
        let g = FlowGraph::build(
            &[
                node("a", "GET_REQUEST"),
                node("b", "TELEPORT"),
                node("a", "POST_REQUEST"),
            ],
            &[],
        );
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.nodes[0].kind, ComponentKind::GetRequest);
        let codes: Vec<&str> = g.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["G002", "G001"]);
    }

    #[test]
    fn drops_self_and_dangling_connections() {
        let g = FlowGraph::build(
            &[node("a", "GET_REQUEST"), node("b", "STATUS_ASSERTION")],
            &[
                ConnectionRecord::new("c1", "a", "a"),
                ConnectionRecord::new("c2", "a", "missing"),
                ConnectionRecord::new("c3", "a", "b"),
            ],
        );
        assert_eq!(g.graph.edge_count(), 1);
        let codes: Vec<&str> = g.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["G004", "G003"]);
        assert_eq!(g.dependencies("b"), vec!["a"]);
    }

    #[test]
    fn drops_duplicate_connection_ids() {
        let g = FlowGraph::build(
            &[node("a", "LOG_MESSAGE"), node("b", "LOG_MESSAGE"), node("c", "LOG_MESSAGE")],
            &[
                ConnectionRecord::new("c1", "a", "b"),
                ConnectionRecord::new("c1", "b", "c"),
                ConnectionRecord::new("", "a", "c"),
                ConnectionRecord::new("", "b", "c"),
            ],
        );
        assert_eq!(g.graph.edge_count(), 3);
        assert_eq!(g.diagnostics.len(), 1);
        assert_eq!(g.diagnostics[0].code, "G005");
        assert_eq!(g.diagnostics[0].subject_id, "c1");
        assert_eq!(g.diagnostics[0].message, "Duplicate connection id 'c1' (b -> c)");
        assert_eq!(g.dependencies("c"), vec!["a", "b"]);
    }

    #[test]
    fn dependencies_follow_connection_order() {
        let g = FlowGraph::build(
            &[node("x", "LOG_MESSAGE"), node("y", "LOG_MESSAGE"), node("z", "LOG_MESSAGE")],
            &[ConnectionRecord::new("c1", "y", "z"), ConnectionRecord::new("c2", "x", "z")],
        );
        assert_eq!(g.dependencies("z"), vec!["y", "x"]);
    }

    #[test]
    fn malformed_payload_keeps_node() {
        let g = FlowGraph::build(&[NodeRecord::new("a", "GET_REQUEST", json!("oops"))], &[]);
        assert_eq!(g.nodes.len(), 1);
        assert!(matches!(g.nodes[0].payload, Payload::Malformed { .. }));
        assert!(g.diagnostics.is_empty());
    }
}
