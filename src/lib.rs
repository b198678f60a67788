//! Compiles a graph of visual test components into a Karate-style feature file.
//!
//! Pipeline: parse → graph build → resolve → emit → assemble. The only fatal
//! outcomes are unparsable input JSON and a dependency cycle; everything else
//! is reported inline as diagnostic steps.

pub mod assemble;
pub mod emit;
pub mod error;
pub mod parse;
pub mod resolve;
pub mod wasm;

pub use assemble::CompiledDocument;
pub use error::{CompilerError, Phase};
pub use parse::{ConnectionRecord, FlowInput, NodeRecord};

use emit::StepBuilder;
use parse::FlowGraph;

pub const TRACING_TARGET: &str = "flow_compiler::compile";

/// Compile nodes and connections into a document.
///
/// Dropped nodes and connections become diagnostic steps ahead of the node
/// steps. A dependency cycle aborts with no document.
pub fn compile(
    nodes: &[NodeRecord],
    connections: &[ConnectionRecord],
) -> Result<CompiledDocument, CompilerError> {
    let graph = FlowGraph::build(nodes, connections);
    compile_graph(&graph)
}

/// Compile an already built graph.
pub fn compile_graph(graph: &FlowGraph) -> Result<CompiledDocument, CompilerError> {
    let order = resolve::resolve_order(graph).inspect_err(|e| {
        tracing::debug!(target: TRACING_TARGET, error = %e, "Compile aborted");
    })?;

    let steps = graph
        .diagnostics
        .iter()
        .fold(StepBuilder::new(), |steps, d| steps.diagnostic(&d.subject_id, d.message.as_str()));
    let steps = order
        .into_iter()
        .fold(steps, |steps, node| emit::emit_node(node, steps))
        .finish();

    let document = CompiledDocument::new(steps);
    tracing::debug!(
        target: TRACING_TARGET,
        node_count = graph.nodes.len(),
        step_count = document.steps.len(),
        diagnostic_count = document.diagnostic_count(),
        "Compiled flow"
    );
    Ok(document)
}

/// Parse a `{ nodes, connections }` JSON document and compile it to text.
pub fn compile_json(json: &str) -> Result<String, CompilerError> {
    let input = parse::parse(json)?;
    compile(&input.nodes, &input.connections).map(|doc| doc.render())
}
