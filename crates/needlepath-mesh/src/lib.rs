#![warn(missing_docs)]

//! Triangle mesh data model for the needlepath trajectory engine.
//!
//! Obstacle and skin surfaces are both plain [`Mesh`] values: a vertex
//! array plus polygon cells. Analysis code works on triangles only and
//! asks for them one cell at a time, so a stray quad surfaces as a
//! [`MeshError::NonTriangularCell`] rather than being split behind the
//! caller's back.

pub mod bbox;
pub mod error;
mod mesh;
mod triangle;

pub use bbox::Aabb3;
pub use error::{MeshError, Result};
pub use mesh::Mesh;
pub use triangle::Triangle;
