//! Proximity graph used to prune polygon collision candidates.
//!
//! Two nodes are linked when their world-space bounding boxes intersect.
//! Intersecting polygons always have intersecting boxes, so the graph is a
//! superset of the overlapping pairs and pruning never drops a correction.

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::simulation::{Node, NodeId};
use crate::spatial::BoundsIndex;

/// Undirected graph over node slots, one edge per candidate pair.
pub struct NeighborGraph {
    graph: StableUnGraph<NodeId, ()>,
}

impl NeighborGraph {
    /// Link every pair of nodes whose bounding boxes intersect.
    ///
    /// Graph node `i` corresponds to node slot `i`.
    pub fn build(nodes: &[Node]) -> Self {
        let mut graph = StableUnGraph::with_capacity(nodes.len(), nodes.len());
        for node in nodes {
            graph.add_node(node.index);
        }
        for (a, b) in BoundsIndex::from_nodes(nodes).candidate_pairs() {
            graph.add_edge(NodeIndex::new(a.slot()), NodeIndex::new(b.slot()), ());
        }
        Self { graph }
    }

    /// Candidate pairs as `(i, j)` slots with `i < j`, sorted.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| {
                let a = edge.source().index();
                let b = edge.target().index();
                (a.min(b), a.max(b))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}
