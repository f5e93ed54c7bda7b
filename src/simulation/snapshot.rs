//! Immutable node snapshots emitted after each advancing command.

use serde::Serialize;

use super::node::{Node, Shape};

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulationState {
    /// Constructed, never started.
    Idle,
    /// Alpha is decaying toward its target.
    Running,
    /// Alpha reached its target; forces still apply each tick.
    Cooled,
    /// Explicitly halted; ticks are no-ops until restart.
    Stopped,
}

impl SimulationState {
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationState::Idle => "idle",
            SimulationState::Running => "running",
            SimulationState::Cooled => "cooled",
            SimulationState::Stopped => "stopped",
        }
    }
}

/// One node as seen by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub index: u32,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            index: node.index.raw(),
            x: node.x,
            y: node.y,
            vx: node.vx,
            vy: node.vy,
            shape: node.shape.clone(),
            group: node.group.clone(),
        }
    }
}

/// All nodes in stable index order plus the schedule state that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub alpha: f64,
    pub state: SimulationState,
    /// Completed ticks since construction or the last reinitialize.
    pub ticks: u64,
    pub nodes: Vec<NodeSnapshot>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Interleaved positions `[x0, y0, x1, y1, ...]`.
    pub fn positions(&self) -> Vec<f64> {
        interleave_positions(self.nodes.iter().map(|node| (node.x, node.y)))
    }
}

/// Flatten `(x, y)` pairs into `[x0, y0, x1, y1, ...]`.
pub(crate) fn interleave_positions(points: impl ExactSizeIterator<Item = (f64, f64)>) -> Vec<f64> {
    let mut positions = Vec::with_capacity(points.len() * 2);
    for (x, y) in points {
        positions.push(x);
        positions.push(y);
    }
    positions
}
