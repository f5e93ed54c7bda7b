//! Simulation configuration.
//!
//! All values are fixed at construction. The struct deserializes from a
//! camelCase JS object (missing fields take their defaults), so the wasm
//! facade can accept a partial config literal.

use serde::{Deserialize, Serialize};

use super::error::{Result, SimulationError};

/// How node shapes are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShapeConfig {
    /// Circles with radii drawn uniformly from `[radius_min, radius_max]`.
    Circle { radius_min: f64, radius_max: f64 },
    /// Jittered blob polygons.
    Blob {
        radius: f64,
        point_count: usize,
        jitter: f64,
    },
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig::Circle {
            radius_min: 5.0,
            radius_max: 20.0,
        }
    }
}

/// Initial node placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Placement {
    /// Sunflower spiral around the origin.
    Phyllotaxis,
    /// Two groups, "red" around `(-offset_x, -offset_y)` heading to
    /// `+destination`, "green" around `(offset_x, offset_y)` heading to
    /// `-destination`, each scattered uniformly by `±spread`.
    GroupSpread {
        offset_x: f64,
        offset_y: f64,
        spread: f64,
        destination: f64,
    },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Phyllotaxis
    }
}

/// Which node pairs a collider tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NeighborStrategy {
    /// Every pair `i < j`. The correctness baseline.
    AllPairs,
    /// Pairs surviving spatial pruning: the quadtree for circles, the
    /// bounding-box proximity graph for blobs.
    SpatialIndex,
}

/// Collision force parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollisionConfig {
    pub strength: f64,
    /// Full resolve passes per step.
    pub iterations: u32,
    /// `None` picks the shape default: spatial index for circles, all pairs
    /// for blobs.
    pub neighbors: Option<NeighborStrategy>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            strength: 1.0,
            iterations: 1,
            neighbors: None,
        }
    }
}

/// Target coordinate for the positional forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionalTarget {
    /// The node's `destination`, or 0 when it has none.
    Destination,
    /// Half the viewport width (x) or height (y).
    ViewportCenter,
    /// Zero on both axes.
    Origin,
}

/// External viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

impl Viewport {
    pub fn validate(&self) -> Result<()> {
        if !(self.width >= 0.0 && self.width.is_finite())
            || !(self.height >= 0.0 && self.height.is_finite())
        {
            return Err(SimulationError::InvalidConfiguration(format!(
                "viewport must be finite and non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Construction-time configuration for a [`SimulationEngine`](super::SimulationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub node_count: usize,
    pub shape: ShapeConfig,
    pub placement: Placement,
    pub collision: CollisionConfig,
    pub positional_strength: f64,
    pub positional_target: PositionalTarget,
    pub alpha_target: f64,
    /// Fraction of the remaining distance to `alpha_target` closed per step.
    pub alpha_decay: f64,
    /// Alpha within this distance of the target snaps to it.
    pub alpha_min: f64,
    /// Fraction of velocity removed at each integration.
    pub velocity_decay: f64,
    pub viewport: Viewport,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: 20,
            shape: ShapeConfig::default(),
            placement: Placement::default(),
            collision: CollisionConfig::default(),
            positional_strength: 0.1,
            positional_target: PositionalTarget::Origin,
            alpha_target: 0.0,
            alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
            alpha_min: 0.001,
            velocity_decay: 0.4,
            viewport: Viewport::default(),
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Collision pair strategy after applying the shape default.
    pub fn neighbor_strategy(&self) -> NeighborStrategy {
        self.collision.neighbors.unwrap_or(match self.shape {
            ShapeConfig::Circle { .. } => NeighborStrategy::SpatialIndex,
            ShapeConfig::Blob { .. } => NeighborStrategy::AllPairs,
        })
    }

    /// Check every field; nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if u32::try_from(self.node_count).is_err() {
            return Err(invalid(format!("node count {} exceeds u32", self.node_count)));
        }

        match self.shape {
            ShapeConfig::Circle {
                radius_min,
                radius_max,
            } => {
                if !(radius_min > 0.0) || !radius_max.is_finite() || radius_max < radius_min {
                    return Err(invalid(format!(
                        "radius range must satisfy 0 < min <= max, got [{radius_min}, {radius_max}]"
                    )));
                }
            }
            ShapeConfig::Blob {
                radius,
                point_count,
                jitter,
            } => {
                if !(radius > 0.0) || !radius.is_finite() {
                    return Err(invalid(format!("blob radius must be positive, got {radius}")));
                }
                if point_count < 3 {
                    return Err(invalid(format!(
                        "blob point count must be at least 3, got {point_count}"
                    )));
                }
                if !(jitter >= 0.0) || !jitter.is_finite() {
                    return Err(invalid(format!("blob jitter must be non-negative, got {jitter}")));
                }
            }
        }

        if let Placement::GroupSpread {
            offset_x,
            offset_y,
            spread,
            destination,
        } = self.placement
        {
            if ![offset_x, offset_y, destination].iter().all(|v| v.is_finite())
                || !(spread >= 0.0 && spread.is_finite())
            {
                return Err(invalid("group spread placement must be finite with spread >= 0".into()));
            }
        }

        if !(self.collision.strength >= 0.0) || !self.collision.strength.is_finite() {
            return Err(invalid(format!(
                "collision strength must be non-negative, got {}",
                self.collision.strength
            )));
        }
        if self.collision.iterations == 0 {
            return Err(invalid("collision iterations must be at least 1".into()));
        }
        if !self.positional_strength.is_finite() {
            return Err(invalid("positional strength must be finite".into()));
        }
        check_unit("alpha target", self.alpha_target)?;
        check_unit("alpha decay", self.alpha_decay)?;
        check_unit("velocity decay", self.velocity_decay)?;
        if !(self.alpha_min > 0.0) || !self.alpha_min.is_finite() {
            return Err(invalid(format!("alpha min must be positive, got {}", self.alpha_min)));
        }
        self.viewport.validate()
    }
}

fn invalid(message: String) -> SimulationError {
    SimulationError::InvalidConfiguration(message)
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}
