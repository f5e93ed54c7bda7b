//! Polygon ("blob") collision force.
//!
//! Each pass materializes every blob in world space at its current center,
//! then for each candidate pair computes the intersection region. The
//! bounding box of that region gives per-axis overlaps, and
//! `overlap / center_distance` scales the separation vector into an equal
//! and opposite velocity correction. Pairs that do not intersect are left
//! alone. Nodes without a blob shape are ignored.
//!
//! Candidates come from every pair ([`NeighborStrategy::AllPairs`]) or from
//! a [`NeighborGraph`] of intersecting bounding boxes
//! ([`NeighborStrategy::SpatialIndex`]). Both visit pairs in `(i, j)` order,
//! so they produce identical velocities.

use geo::{Area, BooleanOps, BoundingRect, Polygon};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geometry::{length, perturb_if_zero, translate_polygon};
use crate::simulation::{NeighborStrategy, Node, NodeId, Shape};

use super::{Force, NeighborGraph};

/// Polygon collider.
#[derive(Debug, Clone)]
pub struct CollideBlob {
    strength: f64,
    iterations: u32,
    strategy: NeighborStrategy,
    rng: StdRng,
}

impl CollideBlob {
    /// Create a collider. `seed` drives the jiggle for coincident centers.
    pub fn new(strength: f64, iterations: u32, strategy: NeighborStrategy, seed: u64) -> Self {
        Self {
            strength,
            iterations,
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn strategy(&self) -> NeighborStrategy {
        self.strategy
    }

    fn resolve(&mut self, nodes: &mut [Node]) {
        let polygons = world_polygons(nodes);
        for (i, j) in candidate_pairs(nodes, self.strategy) {
            let (Some(a), Some(b)) = (&polygons[i], &polygons[j]) else {
                continue;
            };
            let Some((x_overlap, y_overlap)) = overlap_extent(a, b) else {
                continue;
            };

            let x = perturb_if_zero(nodes[i].x - nodes[j].x, &mut self.rng);
            let y = perturb_if_zero(nodes[i].y - nodes[j].y, &mut self.rng);
            let distance = length(x, y);
            let move_x = x * (x_overlap / distance) * self.strength;
            let move_y = y * (y_overlap / distance) * self.strength;

            nodes[i].vx += move_x;
            nodes[i].vy += move_y;
            nodes[j].vx -= move_x;
            nodes[j].vy -= move_y;
        }
    }
}

impl Force for CollideBlob {
    fn apply(&mut self, nodes: &mut [Node], _alpha: f64) {
        if nodes.len() < 2 {
            return;
        }
        for _ in 0..self.iterations {
            self.resolve(nodes);
        }
    }
}

/// Width and height of the bounding box of `a ∩ b`, or `None` when the
/// intersection has no area.
pub fn overlap_extent(a: &Polygon<f64>, b: &Polygon<f64>) -> Option<(f64, f64)> {
    let region = a.intersection(b);
    if region.unsigned_area() <= 0.0 {
        return None;
    }
    let rect = region.bounding_rect()?;
    Some((rect.width(), rect.height()))
}

/// Blob pairs whose world-space polygons intersect, without changing any
/// velocity. Sorted by `(i, j)` with `i < j`.
pub fn overlapping_blob_pairs(nodes: &[Node], strategy: NeighborStrategy) -> Vec<(NodeId, NodeId)> {
    let polygons = world_polygons(nodes);
    candidate_pairs(nodes, strategy)
        .into_iter()
        .filter(|&(i, j)| match (&polygons[i], &polygons[j]) {
            (Some(a), Some(b)) => overlap_extent(a, b).is_some(),
            _ => false,
        })
        .map(|(i, j)| (nodes[i].index, nodes[j].index))
        .collect()
}

fn world_polygons(nodes: &[Node]) -> Vec<Option<Polygon<f64>>> {
    nodes
        .iter()
        .map(|node| match &node.shape {
            Shape::Blob { ring } => Some(translate_polygon(ring, node.x, node.y)),
            Shape::Circle { .. } => None,
        })
        .collect()
}

fn candidate_pairs(nodes: &[Node], strategy: NeighborStrategy) -> Vec<(usize, usize)> {
    match strategy {
        NeighborStrategy::AllPairs => {
            let n = nodes.len();
            (0..n)
                .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
                .collect()
        }
        NeighborStrategy::SpatialIndex => NeighborGraph::build(nodes).pairs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BlobRing, generate_blob_ring};
    use rand::Rng;

    fn square(half: f64) -> BlobRing {
        BlobRing::from_points(vec![
            [-half, -half],
            [half, -half],
            [half, half],
            [-half, half],
            [-half, -half],
        ])
        .unwrap()
    }

    #[test]
    fn test_overlap_extent() {
        let a = translate_polygon(&square(10.0), 0.0, 0.0);
        let b = translate_polygon(&square(10.0), 10.0, 2.0);
        let (w, h) = overlap_extent(&a, &b).unwrap();
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_polygons_no_correction() {
        let mut nodes = vec![
            Node::blob(0, 0.0, 0.0, square(10.0)),
            Node::blob(1, 50.0, 3.0, square(10.0)),
        ];
        let a = translate_polygon(&square(10.0), 0.0, 0.0);
        let b = translate_polygon(&square(10.0), 50.0, 3.0);
        assert!(overlap_extent(&a, &b).is_none());

        CollideBlob::new(1.0, 1, NeighborStrategy::AllPairs, 1).apply(&mut nodes, 1.0);
        for node in &nodes {
            assert_eq!((node.vx, node.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn test_overlapping_blobs_pushed_apart() {
        let mut nodes = vec![
            Node::blob(0, 0.0, 0.0, square(10.0)),
            Node::blob(1, 10.0, 2.0, square(10.0)),
        ];
        CollideBlob::new(0.5, 1, NeighborStrategy::AllPairs, 1).apply(&mut nodes, 1.0);

        let distance = 104.0_f64.sqrt();
        let expected_vx = -10.0 * (10.0 / distance) * 0.5;
        let expected_vy = -2.0 * (18.0 / distance) * 0.5;
        assert!((nodes[0].vx - expected_vx).abs() < 1e-9);
        assert!((nodes[0].vy - expected_vy).abs() < 1e-9);
        assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-12);
        assert!((nodes[0].vy + nodes[1].vy).abs() < 1e-12);
        assert!(nodes[1].vx > 0.0);
        // positions move only in the integrator
        assert_eq!(nodes[1].x, 10.0);
    }

    #[test]
    fn test_coincident_centers_stay_finite() {
        let mut nodes = vec![
            Node::blob(0, 5.0, 5.0, square(4.0)),
            Node::blob(1, 5.0, 5.0, square(4.0)),
        ];
        CollideBlob::new(1.0, 1, NeighborStrategy::AllPairs, 9).apply(&mut nodes, 1.0);
        for node in &nodes {
            assert!(node.vx.is_finite() && node.vy.is_finite());
        }
        assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
    }

    #[test]
    fn test_circle_nodes_ignored() {
        let mut nodes = vec![
            Node::circle(0, 0.0, 0.0, 10.0),
            Node::blob(1, 1.0, 0.0, square(10.0)),
        ];
        CollideBlob::new(1.0, 1, NeighborStrategy::AllPairs, 1).apply(&mut nodes, 1.0);
        assert_eq!(nodes[1].vx, 0.0);
    }

    #[test]
    fn test_neighbor_graph_matches_all_pairs() {
        let mut rng = StdRng::seed_from_u64(21);
        let base: Vec<Node> = (0..30u32)
            .map(|i| {
                let ring = generate_blob_ring(10.0, 20, 10.0, &mut rng).unwrap();
                Node::blob(
                    i,
                    rng.gen_range(-80.0..80.0),
                    rng.gen_range(-80.0..80.0),
                    ring,
                )
            })
            .collect();

        assert_eq!(
            overlapping_blob_pairs(&base, NeighborStrategy::AllPairs),
            overlapping_blob_pairs(&base, NeighborStrategy::SpatialIndex)
        );

        let mut brute = base.clone();
        CollideBlob::new(0.3, 2, NeighborStrategy::AllPairs, 4).apply(&mut brute, 1.0);
        let mut pruned = base.clone();
        CollideBlob::new(0.3, 2, NeighborStrategy::SpatialIndex, 4).apply(&mut pruned, 1.0);

        for (a, b) in brute.iter().zip(&pruned) {
            assert_eq!((a.vx, a.vy), (b.vx, b.vy));
        }
        assert!(brute.iter().any(|n| n.vx != 0.0));
    }
}
