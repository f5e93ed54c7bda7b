//! Initial node construction from a [`SimulationConfig`].

use std::f64::consts::PI;

use rand::Rng;

use super::config::{Placement, ShapeConfig, SimulationConfig};
use super::error::Result;
use super::node::{Node, Shape};
use crate::geometry::generate_blob_ring;

/// Radius of the first phyllotaxis ring.
const PHYLLOTAXIS_RADIUS: f64 = 10.0;

/// Build `config.node_count` resting nodes with dense indices.
///
/// Every shape is drawn before any placement, so the shapes produced for a
/// given seed do not depend on the placement mode.
pub fn build_nodes<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Vec<Node>> {
    config.validate()?;

    let mut shapes = Vec::with_capacity(config.node_count);
    for _ in 0..config.node_count {
        shapes.push(draw_shape(&config.shape, rng)?);
    }

    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let mut nodes = Vec::with_capacity(shapes.len());
    for (i, shape) in shapes.into_iter().enumerate() {
        // validate() bounds node_count to u32
        let index = i as u32;
        let mut node = match shape {
            Shape::Circle { radius } => Node::circle(index, 0.0, 0.0, radius),
            Shape::Blob { ring } => Node::blob(index, 0.0, 0.0, ring),
        };

        match config.placement {
            Placement::Phyllotaxis => {
                let radius = PHYLLOTAXIS_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * golden_angle;
                node.x = radius * angle.cos();
                node.y = radius * angle.sin();
            }
            Placement::GroupSpread {
                offset_x,
                offset_y,
                spread,
                destination,
            } => {
                let red = rng.r#gen::<f64>() > 0.5;
                let sign = if red { -1.0 } else { 1.0 };
                node.group = Some(if red { "red" } else { "green" }.to_string());
                node.x = sign * offset_x + spread * (2.0 * rng.r#gen::<f64>() - 1.0);
                node.y = sign * offset_y + spread * (2.0 * rng.r#gen::<f64>() - 1.0);
                node.destination = Some(-sign * destination);
            }
        }
        nodes.push(node);
    }

    log::debug!("built {} nodes", nodes.len());
    Ok(nodes)
}

fn draw_shape<R: Rng + ?Sized>(shape: &ShapeConfig, rng: &mut R) -> Result<Shape> {
    Ok(match *shape {
        ShapeConfig::Circle {
            radius_min,
            radius_max,
        } => Shape::Circle {
            radius: rng.gen_range(radius_min..=radius_max),
        },
        ShapeConfig::Blob {
            radius,
            point_count,
            jitter,
        } => Shape::Blob {
            ring: generate_blob_ring(radius, point_count, jitter, rng)?,
        },
    })
}
