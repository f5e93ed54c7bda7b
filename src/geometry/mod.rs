//! Geometry utilities for node shapes.
//!
//! - `vector`: scalar/vector helpers, including the jiggle perturbation used
//!   when two centers coincide exactly
//! - `blob`: closed polygon rings ("blobs") relative to a node center

mod blob;
mod vector;

pub use blob::{BlobRing, generate_blob_ring, translate_polygon};
pub use vector::{JIGGLE_SCALE, SNAP_EPSILON, jiggle, length, perturb_if_zero, snap_to_zero};
