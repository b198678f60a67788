//! Dependency map derived from the graph's connections.

use std::collections::HashSet;

use crate::parse::graph::FlowGraph;

/// For each accepted node (by input position), the positions of the nodes it
/// depends on. De-duplicated, in connection order. Rebuilt on every compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMap {
    deps: Vec<Vec<usize>>,
}

impl DependencyMap {
    pub fn build(graph: &FlowGraph) -> Self {
        let deps = graph
            .nodes
            .iter()
            .map(|node| {
                let mut seen = HashSet::new();
                graph
                    .dependencies(&node.id)
                    .into_iter()
                    .filter_map(|source| graph.node_indices.get(source))
                    .map(|idx| idx.index())
                    .filter(|pos| seen.insert(*pos))
                    .collect::<Vec<usize>>()
            })
            .collect();
        DependencyMap { deps }
    }

    pub fn of(&self, position: usize) -> &[usize] {
        self.deps.get(position).map(Vec::as_slice).unwrap_or(&[])
    }
}
