//! Positional pull toward a per-node target coordinate.
//!
//! Each step: `v += (target - position) * strength * alpha` on one axis.

use crate::simulation::{Node, PositionalTarget, Viewport};

use super::Force;

/// Axis a positional force acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Single-axis spring toward a target coordinate.
#[derive(Debug, Clone)]
pub struct PositionForce {
    axis: Axis,
    target: PositionalTarget,
    strength: f64,
    viewport: Viewport,
}

impl PositionForce {
    pub fn new(axis: Axis, target: PositionalTarget, strength: f64, viewport: Viewport) -> Self {
        Self {
            axis,
            target,
            strength,
            viewport,
        }
    }

    pub fn x(target: PositionalTarget, strength: f64, viewport: Viewport) -> Self {
        Self::new(Axis::X, target, strength, viewport)
    }

    pub fn y(target: PositionalTarget, strength: f64, viewport: Viewport) -> Self {
        Self::new(Axis::Y, target, strength, viewport)
    }

    /// Target coordinate for `node` on this force's axis.
    pub fn target_of(&self, node: &Node) -> f64 {
        match self.target {
            PositionalTarget::Destination => node.destination.unwrap_or(0.0),
            PositionalTarget::ViewportCenter => match self.axis {
                Axis::X => self.viewport.width * 0.5,
                Axis::Y => self.viewport.height * 0.5,
            },
            PositionalTarget::Origin => 0.0,
        }
    }
}

impl Force for PositionForce {
    fn apply(&mut self, nodes: &mut [Node], alpha: f64) {
        if self.strength == 0.0 {
            return;
        }
        let k = self.strength * alpha;
        for node in nodes.iter_mut() {
            let target = self.target_of(node);
            match self.axis {
                Axis::X => node.vx += (target - node.x) * k,
                Axis::Y => node.vy += (target - node.y) * k,
            }
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_toward_destination() {
        let mut nodes = vec![Node::circle(0, 10.0, -20.0, 1.0)];
        nodes[0].destination = Some(80.0);

        let mut fx = PositionForce::x(PositionalTarget::Destination, 0.1, Viewport::default());
        let mut fy = PositionForce::y(PositionalTarget::Destination, 0.1, Viewport::default());
        fx.apply(&mut nodes, 1.0);
        fy.apply(&mut nodes, 1.0);

        assert!((nodes[0].vx - 7.0).abs() < 1e-12);
        assert!((nodes[0].vy - 10.0).abs() < 1e-12);
        assert_eq!(nodes[0].x, 10.0);
    }

    #[test]
    fn test_scales_with_alpha() {
        let mut nodes = vec![Node::circle(0, 10.0, 0.0, 1.0)];
        let mut fx = PositionForce::x(PositionalTarget::Origin, 0.5, Viewport::default());
        fx.apply(&mut nodes, 0.5);
        assert!((nodes[0].vx + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_destination_targets_zero() {
        let node = Node::circle(0, 4.0, 4.0, 1.0);
        let fx = PositionForce::x(PositionalTarget::Destination, 1.0, Viewport::default());
        assert_eq!(fx.target_of(&node), 0.0);
    }

    #[test]
    fn test_viewport_center_follows_resize() {
        let node = Node::circle(0, 0.0, 0.0, 1.0);
        let mut fx = PositionForce::x(
            PositionalTarget::ViewportCenter,
            1.0,
            Viewport {
                width: 200.0,
                height: 100.0,
            },
        );
        assert_eq!(fx.target_of(&node), 100.0);

        fx.resize(Viewport {
            width: 640.0,
            height: 480.0,
        });
        assert_eq!(fx.target_of(&node), 320.0);

        let fy = PositionForce::y(
            PositionalTarget::ViewportCenter,
            1.0,
            Viewport {
                width: 640.0,
                height: 480.0,
            },
        );
        assert_eq!(fy.target_of(&node), 240.0);
    }

    #[test]
    fn test_zero_strength_is_noop() {
        let mut nodes = vec![Node::circle(0, 50.0, 50.0, 1.0)];
        let mut fx = PositionForce::x(PositionalTarget::Origin, 0.0, Viewport::default());
        fx.apply(&mut nodes, 1.0);
        assert_eq!(nodes[0].vx, 0.0);
    }
}
