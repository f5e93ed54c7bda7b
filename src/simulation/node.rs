//! Node type and related structures.
//!
//! Nodes are the particles advanced by the simulation. Each node has:
//! - A stable identifier, assigned at creation and never reused
//! - Position (x, y) and velocity (vx, vy)
//! - A shape: a circle radius or a blob ring
//! - Optional group tag and destination used by positional forces

use std::fmt;

use serde::Serialize;

use crate::geometry::BlobRing;

/// Stable node identifier.
///
/// Identifiers are dense over the active node set: the node at slot `i` of
/// the engine's node array has `NodeId(i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Slot of this node in the engine's node array.
    #[inline]
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Collision shape of a node, chosen once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Shape {
    /// A circle of the given radius.
    Circle { radius: f64 },
    /// A closed polygon ring relative to the node center.
    Blob {
        #[serde(rename = "polygon")]
        ring: BlobRing,
    },
}

impl Shape {
    /// Radius of the shape's bounding circle.
    pub fn radius(&self) -> f64 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Blob { ring } => ring.bounding_radius(),
        }
    }

    /// Offset bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Circle { radius } => (-radius, -radius, *radius, *radius),
            Shape::Blob { ring } => ring.extent(),
        }
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, Shape::Blob { .. })
    }
}

/// A simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub index: NodeId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub shape: Shape,
    pub group: Option<String>,
    /// Target coordinate for destination-driven positional forces.
    pub destination: Option<f64>,
}

impl Node {
    /// Create a resting circle node.
    pub fn circle(index: u32, x: f64, y: f64, radius: f64) -> Self {
        Self::with_shape(index, x, y, Shape::Circle { radius })
    }

    /// Create a resting blob node.
    pub fn blob(index: u32, x: f64, y: f64, ring: BlobRing) -> Self {
        Self::with_shape(index, x, y, Shape::Blob { ring })
    }

    fn with_shape(index: u32, x: f64, y: f64, shape: Shape) -> Self {
        Self {
            index: NodeId(index),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            shape,
            group: None,
            destination: None,
        }
    }

    /// Predicted x position after this step's motion.
    #[inline]
    pub fn next_x(&self) -> f64 {
        self.x + self.vx
    }

    /// Predicted y position after this step's motion.
    #[inline]
    pub fn next_y(&self) -> f64 {
        self.y + self.vy
    }

    /// World-space bounding box at the current position.
    pub fn world_extent(&self) -> (f64, f64, f64, f64) {
        let (min_x, min_y, max_x, max_y) = self.shape.extent();
        (self.x + min_x, self.y + min_y, self.x + max_x, self.y + max_y)
    }
}
