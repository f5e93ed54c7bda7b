//! Forces and the ordered force registry.
//!
//! A force adjusts node velocities (never positions). The registry applies
//! its forces in registration order every step; that order is part of the
//! configuration because later forces read velocities written by earlier
//! ones (the colliders predict positions from the current velocity).

mod collide;
mod collide_blob;
mod neighbors;
mod positional;

pub use collide::{CollideCircle, overlapping_circle_pairs};
pub use collide_blob::{CollideBlob, overlap_extent, overlapping_blob_pairs};
pub use neighbors::NeighborGraph;
pub use positional::{Axis, PositionForce};

use crate::simulation::{Node, Result, SimulationError, Viewport};

/// A velocity-adjusting force.
pub trait Force {
    /// Adjust `vx`/`vy` of the targeted nodes for one step at `alpha`.
    fn apply(&mut self, nodes: &mut [Node], alpha: f64);

    /// React to a viewport change. Most forces ignore it.
    fn resize(&mut self, _viewport: Viewport) {}
}

struct NamedForce {
    name: String,
    force: Box<dyn Force>,
}

/// Ordered collection of named forces.
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<NamedForce>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a force.
    ///
    /// A force with the same name is replaced in its existing slot and
    /// returned; otherwise the force is appended.
    pub fn add(&mut self, name: impl Into<String>, force: Box<dyn Force>) -> Option<Box<dyn Force>> {
        let name = name.into();
        if let Some(slot) = self.forces.iter_mut().find(|f| f.name == name) {
            return Some(std::mem::replace(&mut slot.force, force));
        }
        self.forces.push(NamedForce { name, force });
        None
    }

    /// Remove a force by name.
    pub fn remove(&mut self, name: &str) -> Result<Box<dyn Force>> {
        let position = self
            .forces
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| SimulationError::UnknownForce(name.to_string()))?;
        Ok(self.forces.remove(position).force)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forces.iter().any(|f| f.name == name)
    }

    /// Force names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.forces.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Apply every force once, in order.
    pub fn apply_all(&mut self, nodes: &mut [Node], alpha: f64) {
        for named in &mut self.forces {
            named.force.apply(nodes, alpha);
        }
    }

    /// Forward a viewport change to every force.
    pub fn resize_all(&mut self, viewport: Viewport) {
        for named in &mut self.forces {
            named.force.resize(viewport);
        }
    }
}
