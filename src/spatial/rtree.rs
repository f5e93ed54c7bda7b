//! R-tree based bounds index using the rstar crate.
//!
//! Stores each node's world-space bounding box and answers which node pairs
//! have intersecting boxes (collision candidates).

use rstar::{AABB, RTree, RTreeObject};

use crate::simulation::{Node, NodeId};

/// A node's bounding box in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBounds {
    /// The node identifier.
    pub id: NodeId,
    /// Lower corner `[min_x, min_y]`.
    pub min: [f64; 2],
    /// Upper corner `[max_x, max_y]`.
    pub max: [f64; 2],
}

impl NodeBounds {
    /// Create a new NodeBounds.
    pub fn new(id: NodeId, min: [f64; 2], max: [f64; 2]) -> Self {
        Self { id, min, max }
    }

    /// Bounds of a node's shape at its current position.
    pub fn of_node(node: &Node) -> Self {
        let (min_x, min_y, max_x, max_y) = node.world_extent();
        Self::new(node.index, [min_x, min_y], [max_x, max_y])
    }
}

impl RTreeObject for NodeBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// Bounding-box index over node shapes.
///
/// Uses an R*-tree, bulk loaded once per query batch.
pub struct BoundsIndex {
    tree: RTree<NodeBounds>,
}

impl BoundsIndex {
    /// Bulk load the world-space bounds of `nodes`.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let bounds: Vec<_> = nodes.iter().map(NodeBounds::of_node).collect();
        Self {
            tree: RTree::bulk_load(bounds),
        }
    }

    /// All pairs `(a, b)` with `a < b` whose boxes intersect, sorted.
    ///
    /// Touching boxes count as intersecting, so the result is a superset of
    /// the pairs whose shapes overlap.
    pub fn candidate_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs = Vec::new();
        for bounds in self.tree.iter() {
            for other in self.tree.locate_in_envelope_intersecting(&bounds.envelope()) {
                if other.id > bounds.id {
                    pairs.push((bounds.id, other.id));
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}
