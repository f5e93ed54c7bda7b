//! Simulation core: node storage, configuration, the alpha schedule and the
//! tick loop.
//!
//! The engine owns its nodes exclusively. Forces borrow them mutably for the
//! duration of one step; callers only ever see [`Snapshot`] copies.

mod config;
mod engine;
mod error;
mod factory;
mod node;
mod snapshot;

pub use config::{
    CollisionConfig, NeighborStrategy, Placement, PositionalTarget, ShapeConfig, SimulationConfig,
    Viewport,
};
pub use engine::SimulationEngine;
pub use error::{Result, SimulationError};
pub use factory::build_nodes;
pub use node::{Node, NodeId, Shape};
pub use snapshot::{NodeSnapshot, SimulationState, Snapshot};
