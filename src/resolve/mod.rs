//! Dependency resolution: connections → dependency map → emission order.
//!
//! Order is a depth-first post-order whose roots are taken in input order, so
//! nodes without connections keep their relative input order. Ties between
//! independent subgraphs are decided by input array order and nothing else.

mod deps;

pub use deps::DependencyMap;

use crate::error::CompilerError;
use crate::parse::graph::{FlowGraph, Node};

pub const TRACING_TARGET: &str = "flow_compiler::resolve";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Returns the accepted nodes in emission order, dependencies first.
///
/// Revisiting a node that is still in progress means the connections form a
/// cycle; that aborts the compile with the cycle path.
pub fn resolve_order(graph: &FlowGraph) -> Result<Vec<&Node>, CompilerError> {
    let deps = DependencyMap::build(graph);
    let count = graph.nodes.len();
    let mut marks = vec![Mark::Unvisited; count];
    let mut order = Vec::with_capacity(count);

    for root in 0..count {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // (node position, index of the next dependency to visit)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::InProgress;

        while let Some(frame) = stack.last_mut() {
            let current = frame.0;
            let Some(&next) = deps.of(current).get(frame.1) else {
                marks[current] = Mark::Done;
                order.push(&graph.nodes[current]);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[next] {
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
                Mark::InProgress => {
                    let start = stack.iter().position(|(i, _)| *i == next).unwrap_or(0);
                    let mut path: Vec<String> = stack[start..]
                        .iter()
                        .map(|(i, _)| graph.nodes[*i].id.clone())
                        .collect();
                    path.push(graph.nodes[next].id.clone());

                    tracing::debug!(
                        target: TRACING_TARGET,
                        node_id = %graph.nodes[next].id,
                        cycle_len = path.len() - 1,
                        "Dependency cycle detected"
                    );
                    return Err(CompilerError::cycle(path));
                }
            }
        }
    }

    tracing::debug!(
        target: TRACING_TARGET,
        node_count = order.len(),
        edge_count = graph.graph.edge_count(),
        "Resolved emission order"
    );

    Ok(order)
}
