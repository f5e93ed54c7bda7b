//! Scalar and 2D vector helpers.

use rand::Rng;

/// Magnitude of the jiggle perturbation.
pub const JIGGLE_SCALE: f64 = 1e-6;

/// Coordinates with an absolute value below this snap to exactly zero.
pub const SNAP_EPSILON: f64 = 1e-10;

/// A tiny signed random value with magnitude in `[0.5e-6, 1e-6]`.
///
/// Never returns zero, so it is safe to use as a divisor component.
pub fn jiggle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let magnitude = JIGGLE_SCALE * (0.5 + 0.5 * rng.r#gen::<f64>());
    if rng.gen_bool(0.5) { magnitude } else { -magnitude }
}

/// Return `v` unchanged unless it is exactly zero, in which case jiggle it.
///
/// Apply this to each axis independently before normalizing a separation
/// vector.
#[inline]
pub fn perturb_if_zero<R: Rng + ?Sized>(v: f64, rng: &mut R) -> f64 {
    if v == 0.0 { jiggle(rng) } else { v }
}

/// Snap values within `SNAP_EPSILON` of zero to zero.
#[inline]
pub fn snap_to_zero(v: f64) -> f64 {
    if v.abs() < SNAP_EPSILON { 0.0 } else { v }
}

/// Euclidean length of `(x, y)`.
#[inline]
pub fn length(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}
