//! Blob rings: closed polygons stored as offsets from a node center.
//!
//! A ring is always closed (first point == last point) and carries at least
//! three distinct vertices. Validation happens once, when the ring is built,
//! so colliders can assume well-formed input every step.

use std::f64::consts::TAU;

use geo::{Coord, LineString, Polygon};
use rand::Rng;
use serde::Serialize;

use super::vector::{length, snap_to_zero};
use crate::simulation::{Result, SimulationError};

/// A closed polygon ring of `(dx, dy)` offsets relative to a node center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BlobRing {
    points: Vec<[f64; 2]>,
}

impl BlobRing {
    /// Build a ring from explicit offsets.
    ///
    /// The ring must be closed and have at least three distinct vertices
    /// (four points including the closing one).
    pub fn from_points(points: Vec<[f64; 2]>) -> Result<Self> {
        if points.len() < 4 {
            return Err(SimulationError::InvalidGeometry(format!(
                "ring needs at least 3 vertices plus a closing point, got {} points",
                points.len()
            )));
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidGeometry(
                "ring contains a non-finite coordinate".into(),
            ));
        }
        let first = points[0];
        let last = points[points.len() - 1];
        if first != last {
            return Err(SimulationError::InvalidGeometry(format!(
                "ring is not closed: first point {first:?} != last point {last:?}"
            )));
        }
        let mut distinct: Vec<[f64; 2]> = Vec::with_capacity(3);
        for point in &points[..points.len() - 1] {
            if !distinct.contains(point) {
                distinct.push(*point);
                if distinct.len() == 3 {
                    break;
                }
            }
        }
        if distinct.len() < 3 {
            return Err(SimulationError::InvalidGeometry(format!(
                "ring needs at least 3 distinct vertices, got {}",
                distinct.len()
            )));
        }
        Ok(Self { points })
    }

    /// All ring points, including the closing point.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Number of distinct vertices (the closing point is not counted).
    pub fn vertex_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Largest distance from the center to any vertex.
    pub fn bounding_radius(&self) -> f64 {
        self.points
            .iter()
            .map(|p| length(p[0], p[1]))
            .fold(0.0, f64::max)
    }

    /// Offset bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }
        (min_x, min_y, max_x, max_y)
    }
}

/// Generate a jittered blob ring.
///
/// Samples `point_count` angularly even points on a circle of `radius`, pushes
/// each outward by a uniform amount in `[0, jitter]`, then closes the ring.
/// Near-zero coordinates snap to exactly zero.
pub fn generate_blob_ring<R: Rng + ?Sized>(
    radius: f64,
    point_count: usize,
    jitter: f64,
    rng: &mut R,
) -> Result<BlobRing> {
    if point_count < 3 {
        return Err(SimulationError::InvalidGeometry(format!(
            "blob needs at least 3 points, got {point_count}"
        )));
    }
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(SimulationError::InvalidGeometry(format!(
            "blob radius must be positive, got {radius}"
        )));
    }
    if !(jitter >= 0.0) || !jitter.is_finite() {
        return Err(SimulationError::InvalidGeometry(format!(
            "blob jitter must be non-negative, got {jitter}"
        )));
    }

    let mut points = Vec::with_capacity(point_count + 1);
    for i in 0..point_count {
        let radians = i as f64 * TAU / point_count as f64;
        let r = radius + rng.r#gen::<f64>() * jitter;
        let x = snap_to_zero(radians.cos() * r);
        let y = snap_to_zero(radians.sin() * r);
        points.push([x, y]);
    }
    points.push(points[0]);

    BlobRing::from_points(points)
}

/// Materialize a ring in world space around `(cx, cy)`.
pub fn translate_polygon(ring: &BlobRing, cx: f64, cy: f64) -> Polygon<f64> {
    let exterior: LineString<f64> = ring
        .points
        .iter()
        .map(|p| Coord {
            x: p[0] + cx,
            y: p[1] + cy,
        })
        .collect();
    Polygon::new(exterior, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

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
    fn test_generate_ring_is_closed() {
        let mut rng = StdRng::seed_from_u64(3);
        let ring = generate_blob_ring(10.0, 20, 10.0, &mut rng).unwrap();

        assert_eq!(ring.points().len(), 21);
        assert_eq!(ring.vertex_count(), 20);
        assert_eq!(ring.points()[0], ring.points()[20]);
    }

    #[test]
    fn test_generate_ring_radius_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let ring = generate_blob_ring(10.0, 32, 5.0, &mut rng).unwrap();

        for p in ring.points() {
            let r = length(p[0], p[1]);
            assert!(r >= 10.0 - 1e-9, "point {p:?} inside base radius");
            assert!(r <= 15.0 + 1e-9, "point {p:?} beyond jitter");
        }
        assert!(ring.bounding_radius() <= 15.0 + 1e-9);
    }

    #[test]
    fn test_generate_ring_snaps_axis_points() {
        let mut rng = StdRng::seed_from_u64(5);
        // With 4 points the samples sit on the axes, so cos/sin residue snaps.
        let ring = generate_blob_ring(10.0, 4, 0.0, &mut rng).unwrap();

        assert_eq!(ring.points()[0], [10.0, 0.0]);
        assert_eq!(ring.points()[1], [0.0, 10.0]);
        assert_eq!(ring.points()[2], [-10.0, 0.0]);
        assert_eq!(ring.points()[3], [0.0, -10.0]);
    }

    #[test]
    fn test_generate_ring_is_deterministic_per_seed() {
        let a = generate_blob_ring(10.0, 12, 4.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate_blob_ring(10.0, 12, 4.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let c = generate_blob_ring(10.0, 12, 4.0, &mut StdRng::seed_from_u64(10)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_ring_rejects_degenerate() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_blob_ring(10.0, 2, 1.0, &mut rng),
            Err(SimulationError::InvalidGeometry(_))
        ));
        assert!(matches!(
            generate_blob_ring(0.0, 8, 1.0, &mut rng),
            Err(SimulationError::InvalidGeometry(_))
        ));
        assert!(matches!(
            generate_blob_ring(5.0, 8, -1.0, &mut rng),
            Err(SimulationError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_from_points_rejects_open_ring() {
        let result = BlobRing::from_points(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert!(matches!(result, Err(SimulationError::InvalidGeometry(_))));
    }

    #[test]
    fn test_from_points_rejects_too_few() {
        let result = BlobRing::from_points(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]);
        assert!(matches!(result, Err(SimulationError::InvalidGeometry(_))));
    }

    #[test]
    fn test_from_points_rejects_coincident_vertices() {
        let result = BlobRing::from_points(vec![[0.0, 0.0]; 4]);
        assert!(matches!(result, Err(SimulationError::InvalidGeometry(_))));

        let result = BlobRing::from_points(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 0.0],
        ]);
        assert!(matches!(result, Err(SimulationError::InvalidGeometry(_))));

        // a repeated vertex is fine while three distinct ones remain
        let ring = BlobRing::from_points(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]);
        assert!(ring.is_ok());
    }

    #[test]
    fn test_extent() {
        let ring = square(2.0);
        assert_eq!(ring.extent(), (-2.0, -2.0, 2.0, 2.0));
    }

    #[test]
    fn test_translate_polygon() {
        let ring = square(1.0);
        let polygon = translate_polygon(&ring, 10.0, -5.0);
        let coords: Vec<_> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();

        assert_eq!(coords.len(), 5);
        assert_eq!(coords[0], (9.0, -6.0));
        assert_eq!(coords[2], (11.0, -4.0));
        assert_eq!(coords[0], coords[4]);
    }
}
