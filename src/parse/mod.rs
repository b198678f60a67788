//! Parse phase: JSON → wire records → decoded components + graph construction.

pub mod component;
pub mod graph;
pub mod normalize;
pub mod types;

pub use component::{Component, ComponentKind};
pub use graph::{FlowGraph, GraphDiagnostic, Node, Payload};
pub use types::*;

use crate::error::CompilerError;

pub const TRACING_TARGET: &str = "flow_compiler::parse";

/// Deserialize a flow JSON string into a `FlowInput`.
pub fn parse(json: &str) -> Result<FlowInput, CompilerError> {
    serde_json::from_str::<FlowInput>(json)
        .map_err(|e| CompilerError::parse("P001", format!("Failed to parse flow JSON: {}", e)))
}

/// Parse JSON and build the graph in one step.
pub fn parse_and_build(json: &str) -> Result<FlowGraph, CompilerError> {
    let input = parse(json)?;
    Ok(FlowGraph::build(&input.nodes, &input.connections))
}
