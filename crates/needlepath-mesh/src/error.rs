//! Error types for mesh access and validation.

use thiserror::Error;

/// Errors that can occur when reading or validating a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A cell references a vertex that does not exist.
    #[error("cell {cell} references vertex {index}, but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Cell containing the bad reference.
        cell: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A cell was accessed as a triangle but has a different vertex count.
    #[error("cell {cell} has {len} vertices, expected a triangle")]
    NonTriangularCell {
        /// Cell index.
        cell: usize,
        /// Number of vertices in the cell.
        len: usize,
    },

    /// Requested cell does not exist.
    #[error("cell {0} does not exist")]
    MissingCell(usize),

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),

    /// Flat vertex/index buffers have an invalid length.
    #[error("malformed mesh buffer: {0}")]
    MalformedBuffer(String),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
