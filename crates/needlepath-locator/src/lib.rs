#![warn(missing_docs)]

//! Segment-vs-mesh spatial index for the needlepath trajectory engine.
//!
//! A [`SpatialIndex`] is built once from an obstacle mesh and then answers
//! "does the segment from `a` to `b` cross the obstacle surface?" for as
//! many segments as the caller needs, from any number of threads.
//!
//! # Architecture
//!
//! - [`Segment`] - Segment representation with slab tests against boxes
//! - [`intersect`] - Segment-triangle crossing test with tolerance
//! - [`bvh`] - Bounding volume hierarchy for acceleration
//! - [`SpatialIndex`] - Query front end over an obstacle [`Mesh`](needlepath_mesh::Mesh)
//!
//! # Example
//!
//! ```
//! use needlepath_locator::SpatialIndex;
//! use needlepath_math::Point3;
//! use needlepath_mesh::Mesh;
//!
//! let wall = Mesh::from_triangles(
//!     vec![
//!         Point3::new(-1.0, -1.0, 0.0),
//!         Point3::new(1.0, -1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     &[[0, 1, 2]],
//! );
//! let index = SpatialIndex::build(&wall).unwrap();
//!
//! let above = Point3::new(0.0, 0.0, 1.0);
//! let below = Point3::new(0.0, 0.0, -1.0);
//! assert!(index.intersects(&above, &below, 0.001));
//! ```

pub mod bvh;
pub mod error;
mod index;
pub mod intersect;
mod segment;

pub use bvh::Bvh;
pub use error::{LocatorError, Result};
pub use index::{SegmentHit, SpatialIndex};
pub use segment::Segment;
