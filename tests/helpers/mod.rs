use flow_compiler::{CompiledDocument, ConnectionRecord, NodeRecord, compile, parse};
use serde_json::Value;

// =============================================================================
// Record builders
// =============================================================================

pub fn node(id: &str, node_type: &str, data: Value) -> NodeRecord {
    NodeRecord::new(id, node_type, data)
}

pub fn conn(from: &str, to: &str) -> ConnectionRecord {
    ConnectionRecord::new(format!("{from}->{to}"), from, to)
}

// =============================================================================
// Compile helpers
// =============================================================================

/// Parse a fixture and compile it, panicking on any fatal error.
pub fn compile_fixture(json: &str) -> CompiledDocument {
    let input = parse::parse(json).expect("fixture should parse");
    compile(&input.nodes, &input.connections).expect("fixture should compile")
}

/// Rendered step lines without indentation.
pub fn lines(doc: &CompiledDocument) -> Vec<String> {
    doc.steps.iter().map(|s| s.line()).collect()
}

/// Number of steps a single node emits when compiled alone.
pub fn steps_of(record: &NodeRecord) -> usize {
    compile(std::slice::from_ref(record), &[])
        .expect("single node compiles")
        .steps
        .len()
}
