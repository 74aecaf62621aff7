//! Error types for index construction.

use needlepath_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while building a [`crate::SpatialIndex`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    /// The obstacle mesh failed validation.
    #[error("invalid obstacle mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Result type for locator operations.
pub type Result<T> = std::result::Result<T, LocatorError>;
