//! Circle collision force.
//!
//! Works on predicted positions (`x + vx`, `y + vy`) so fast nodes are
//! separated before they pass through each other. For every node `i` and
//! every `j > i` whose predicted circles overlap, a correction is split
//! between the pair with weight `rj² / (ri² + rj²)` on `i`, so larger nodes
//! move less. Corrections are added to velocities only.
//!
//! With [`NeighborStrategy::SpatialIndex`] each pass builds a quadtree of
//! predicted centers and skips regions whose box lies farther than
//! `ri + max_radius(region)` from the probe on either axis.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geometry::perturb_if_zero;
use crate::simulation::{NeighborStrategy, Node, NodeId};
use crate::spatial::{QuadEntry, QuadTree};

use super::Force;

/// Circle collider.
#[derive(Debug, Clone)]
pub struct CollideCircle {
    strength: f64,
    iterations: u32,
    strategy: NeighborStrategy,
    rng: StdRng,
}

/// The node being resolved against its neighbors, captured once per pass.
#[derive(Debug, Clone, Copy)]
struct Probe {
    slot: usize,
    x: f64,
    y: f64,
    radius: f64,
}

impl Probe {
    fn of(nodes: &[Node], slot: usize) -> Self {
        let node = &nodes[slot];
        Self {
            slot,
            x: node.next_x(),
            y: node.next_y(),
            radius: node.shape.radius(),
        }
    }
}

impl CollideCircle {
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

    fn resolve_all_pairs(&mut self, nodes: &mut [Node]) {
        for i in 0..nodes.len() {
            let probe = Probe::of(nodes, i);
            for j in (i + 1)..nodes.len() {
                resolve_pair(nodes, probe, j, self.strength, &mut self.rng);
            }
        }
    }

    fn resolve_indexed(&mut self, nodes: &mut [Node]) {
        let tree = QuadTree::build(&predicted_entries(nodes));
        let strength = self.strength;
        let rng = &mut self.rng;

        for i in 0..nodes.len() {
            let probe = Probe::of(nodes, i);
            tree.visit(|quad| {
                if let Some(entries) = quad.entries {
                    for entry in entries.iter().filter(|e| e.item > i) {
                        resolve_pair(nodes, probe, entry.item, strength, rng);
                    }
                    return false;
                }
                quad.bounds
                    .outside(probe.x, probe.y, probe.radius + quad.max_radius)
            });
        }
    }
}

impl Force for CollideCircle {
    fn apply(&mut self, nodes: &mut [Node], _alpha: f64) {
        if nodes.len() < 2 {
            return;
        }
        for _ in 0..self.iterations {
            match self.strategy {
                NeighborStrategy::AllPairs => self.resolve_all_pairs(nodes),
                NeighborStrategy::SpatialIndex => self.resolve_indexed(nodes),
            }
        }
    }
}

/// Resolve one pair; returns whether the predicted circles overlapped.
fn resolve_pair(nodes: &mut [Node], probe: Probe, j: usize, strength: f64, rng: &mut StdRng) -> bool {
    let rj = nodes[j].shape.radius();
    let r = probe.radius + rj;
    let mut x = probe.x - nodes[j].next_x();
    let mut y = probe.y - nodes[j].next_y();
    let mut l = x * x + y * y;
    if l >= r * r {
        return false;
    }

    if x == 0.0 {
        x = perturb_if_zero(x, rng);
        l += x * x;
    }
    if y == 0.0 {
        y = perturb_if_zero(y, rng);
        l += y * y;
    }
    let l = l.sqrt();
    let scale = (r - l) / l * strength;

    let ri2 = probe.radius * probe.radius;
    let rj2 = rj * rj;
    let weight = rj2 / (ri2 + rj2);
    x *= scale;
    y *= scale;

    let node = &mut nodes[probe.slot];
    node.vx += x * weight;
    node.vy += y * weight;
    let other = &mut nodes[j];
    other.vx -= x * (1.0 - weight);
    other.vy -= y * (1.0 - weight);
    true
}

fn predicted_entries(nodes: &[Node]) -> Vec<QuadEntry> {
    nodes
        .iter()
        .enumerate()
        .map(|(item, node)| QuadEntry {
            item,
            x: node.next_x(),
            y: node.next_y(),
            radius: node.shape.radius(),
        })
        .collect()
}

/// Pairs whose predicted circles overlap, without changing any velocity.
///
/// Sorted by `(i, j)` with `i < j`.
pub fn overlapping_circle_pairs(nodes: &[Node], strategy: NeighborStrategy) -> Vec<(NodeId, NodeId)> {
    let overlaps = |a: &Node, b: &Node| {
        let x = a.next_x() - b.next_x();
        let y = a.next_y() - b.next_y();
        let r = a.shape.radius() + b.shape.radius();
        x * x + y * y < r * r
    };

    let mut pairs = Vec::new();
    match strategy {
        NeighborStrategy::AllPairs => {
            for i in 0..nodes.len() {
                for j in (i + 1)..nodes.len() {
                    if overlaps(&nodes[i], &nodes[j]) {
                        pairs.push((nodes[i].index, nodes[j].index));
                    }
                }
            }
        }
        NeighborStrategy::SpatialIndex => {
            let tree = QuadTree::build(&predicted_entries(nodes));
            for i in 0..nodes.len() {
                let probe = Probe::of(nodes, i);
                tree.visit(|quad| {
                    if let Some(entries) = quad.entries {
                        for entry in entries.iter().filter(|e| e.item > i) {
                            if overlaps(&nodes[i], &nodes[entry.item]) {
                                pairs.push((nodes[i].index, nodes[entry.item].index));
                            }
                        }
                        return false;
                    }
                    quad.bounds
                        .outside(probe.x, probe.y, probe.radius + quad.max_radius)
                });
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
