//! Spatial indexing for collision pruning.
//!
//! - `quadtree`: point quadtree over predicted node centers, rebuilt every
//!   collision pass, with a cached max radius per region
//! - `rtree`: R-tree over node bounding boxes, used to build the blob
//!   proximity graph

mod quadtree;
mod rtree;

pub use quadtree::{Bounds, QuadEntry, QuadTree, QuadVisit};
pub use rtree::{BoundsIndex, NodeBounds};
