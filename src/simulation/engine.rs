//! SimulationEngine - owns the nodes, the force registry and the alpha
//! schedule.
//!
//! One tick applies every registered force in order at the current alpha,
//! integrates velocity into position (with velocity decay), then moves alpha
//! a fixed fraction of the way toward its target. Once alpha is within
//! `alpha_min` of the target it is clamped there and the engine is cooled;
//! ticks keep applying forces but alpha no longer changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ShapeConfig, SimulationConfig, Viewport};
use super::error::{Result, SimulationError};
use super::factory::build_nodes;
use super::node::{Node, NodeId, Shape};
use super::snapshot::{NodeSnapshot, SimulationState, Snapshot, interleave_positions};
use crate::force::{
    CollideBlob, CollideCircle, ForceRegistry, PositionForce, overlapping_blob_pairs,
    overlapping_circle_pairs,
};

/// The simulation engine.
///
/// This struct manages:
/// - Node storage, in dense index order
/// - The ordered force registry
/// - Alpha and the idle/running/cooled/stopped lifecycle
/// - The viewport consumed by screen-relative forces
pub struct SimulationEngine {
    config: SimulationConfig,
    nodes: Vec<Node>,
    forces: ForceRegistry,
    alpha: f64,
    state: SimulationState,
    viewport: Viewport,
    /// Source for node construction and collider seeds.
    rng: StdRng,
    ticks: u64,
}

impl SimulationEngine {
    /// Build nodes and the default forces from `config`.
    ///
    /// Forces are registered as `"collide"` (circle or blob collider, by
    /// shape), then `"x"` and `"y"` positional pulls.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let nodes = build_nodes(&config, &mut rng)?;
        let forces = default_forces(&config, &mut rng);
        log::debug!(
            "engine created: {} nodes, forces {:?}",
            nodes.len(),
            forces.names()
        );
        Ok(Self::assemble(config, nodes, forces, rng))
    }

    /// Assemble an engine from caller-built nodes and forces.
    ///
    /// Node `i` must carry index `i`, and circle radii must be positive.
    pub fn from_parts(config: SimulationConfig, nodes: Vec<Node>, forces: ForceRegistry) -> Result<Self> {
        config.validate()?;
        for (slot, node) in nodes.iter().enumerate() {
            if node.index.slot() != slot {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} found at slot {slot}; indices must be dense",
                    node.index
                )));
            }
            if let Shape::Circle { radius } = node.shape {
                if !(radius > 0.0) || !radius.is_finite() {
                    return Err(SimulationError::InvalidGeometry(format!(
                        "{} has radius {radius}",
                        node.index
                    )));
                }
            }
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, nodes, forces, rng))
    }

    fn assemble(config: SimulationConfig, nodes: Vec<Node>, forces: ForceRegistry, rng: StdRng) -> Self {
        Self {
            viewport: config.viewport,
            config,
            nodes,
            forces,
            alpha: 1.0,
            state: SimulationState::Idle,
            rng,
            ticks: 0,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Leave `idle`. Alpha is not advanced. Other states are unchanged.
    pub fn start(&mut self) {
        if self.state == SimulationState::Idle {
            self.state = SimulationState::Running;
            log::debug!("started with {} nodes", self.nodes.len());
        }
    }

    /// Advance one step. Returns `false` (and does nothing) when stopped.
    pub fn tick(&mut self) -> bool {
        match self.state {
            SimulationState::Stopped => return false,
            SimulationState::Idle => self.state = SimulationState::Running,
            SimulationState::Running | SimulationState::Cooled => {}
        }

        self.forces.apply_all(&mut self.nodes, self.alpha);

        let keep = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            node.vx *= keep;
            node.vy *= keep;
            node.x += node.vx;
            node.y += node.vy;
        }
        self.ticks += 1;

        if self.state == SimulationState::Running {
            let target = self.config.alpha_target;
            self.alpha += (target - self.alpha) * self.config.alpha_decay;
            if (self.alpha - target).abs() < self.config.alpha_min {
                self.alpha = target;
                self.state = SimulationState::Cooled;
                log::debug!("cooled after {} ticks", self.ticks);
            }
        }
        log::trace!("tick {} alpha {:.5}", self.ticks, self.alpha);
        true
    }

    /// Reset alpha to 1 and resume running, from any state. Nodes are kept.
    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.state = SimulationState::Running;
        log::debug!("restarted");
    }

    /// Halt. Ticks are no-ops until [`restart`](Self::restart).
    pub fn stop(&mut self) {
        self.state = SimulationState::Stopped;
        log::debug!("stopped at alpha {:.5}", self.alpha);
    }

    /// Update the viewport used by screen-relative forces. Does not step.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let viewport = Viewport { width, height };
        viewport.validate()?;
        self.viewport = viewport;
        self.forces.resize_all(viewport);
        log::debug!("viewport resized to {width}x{height}");
        Ok(())
    }

    /// Replace every node with a fresh batch from the factory and return to
    /// `idle` at alpha 1. Registered forces are kept.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.nodes = build_nodes(&self.config, &mut self.rng)?;
        self.alpha = 1.0;
        self.state = SimulationState::Idle;
        self.ticks = 0;
        log::debug!("reinitialized with {} nodes", self.nodes.len());
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Copy of every node in index order, with the schedule state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            alpha: self.alpha,
            state: self.state,
            ticks: self.ticks,
            nodes: self.nodes.iter().map(NodeSnapshot::from).collect(),
        }
    }

    /// Interleaved positions `[x0, y0, x1, y1, ...]`, same layout as
    /// [`Snapshot::positions`].
    pub fn positions(&self) -> Vec<f64> {
        interleave_positions(self.nodes.iter().map(|node| (node.x, node.y)))
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    /// Mutable access to the registry, for adding or replacing forces.
    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }

    /// Ticks until the engine cools from the current alpha.
    ///
    /// `Some(0)` when already cooled, `None` when stopped or when alpha can
    /// never reach the target (`alpha_decay == 0`).
    pub fn steps_to_cool(&self) -> Option<usize> {
        match self.state {
            SimulationState::Cooled => return Some(0),
            SimulationState::Stopped => return None,
            SimulationState::Idle | SimulationState::Running => {}
        }
        let gap = (self.alpha - self.config.alpha_target).abs();
        if gap < self.config.alpha_min {
            // the first tick clamps
            return Some(1);
        }
        let decay = self.config.alpha_decay;
        if decay <= 0.0 {
            return None;
        }
        let steps = ((self.config.alpha_min / gap).ln() / (1.0 - decay).ln()).floor();
        Some(steps as usize + 1)
    }

    /// Node pairs whose shapes currently overlap, as the configured collider
    /// sees them: predicted circles, or blob polygons at their centers.
    pub fn overlapping_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let strategy = self.config.neighbor_strategy();
        match self.config.shape {
            ShapeConfig::Circle { .. } => overlapping_circle_pairs(&self.nodes, strategy),
            ShapeConfig::Blob { .. } => overlapping_blob_pairs(&self.nodes, strategy),
        }
    }

    /// World-space bounding box of every node shape.
    pub fn get_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for node in &self.nodes {
            let (x0, y0, x1, y1) = node.world_extent();
            min_x = min_x.min(x0);
            min_y = min_y.min(y0);
            max_x = max_x.max(x1);
            max_y = max_y.max(y1);
        }
        Some((min_x, min_y, max_x, max_y))
    }
}

fn default_forces(config: &SimulationConfig, rng: &mut StdRng) -> ForceRegistry {
    let collision = &config.collision;
    let strategy = config.neighbor_strategy();
    let seed = rng.r#gen::<u64>();

    let mut forces = ForceRegistry::new();
    match config.shape {
        ShapeConfig::Circle { .. } => forces.add(
            "collide",
            Box::new(CollideCircle::new(collision.strength, collision.iterations, strategy, seed)),
        ),
        ShapeConfig::Blob { .. } => forces.add(
            "collide",
            Box::new(CollideBlob::new(collision.strength, collision.iterations, strategy, seed)),
        ),
    };
    forces.add(
        "x",
        Box::new(PositionForce::x(
            config.positional_target,
            config.positional_strength,
            config.viewport,
        )),
    );
    forces.add(
        "y",
        Box::new(PositionForce::y(
            config.positional_target,
            config.positional_strength,
            config.viewport,
        )),
    );
    forces
}
