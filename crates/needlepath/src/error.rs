//! Error types for trajectory analysis.

use needlepath_locator::LocatorError;
use needlepath_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid analysis parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A mesh failed validation.
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    /// The obstacle index could not be built.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// A path index was outside the path set.
    #[error("path index {index} out of range for {len} paths")]
    PathIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of paths in the set.
        len: usize,
    },

    /// Interpolation parameter outside `[0, 1]`.
    #[error("interpolation parameter {0} is outside [0, 1]")]
    InvalidInterpolation(f64),

    /// A target provider produced no sample points.
    #[error("target provider produced no sample points")]
    NoTargets,

    /// Invalid target description.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The caller interrupted the run.
    #[error("analysis cancelled")]
    Cancelled,
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::PathIndexOutOfRange { index: 7, len: 3 };
        assert!(format!("{err}").contains("7"));

        let err = AnalysisError::InvalidInterpolation(1.5);
        assert!(format!("{err}").contains("1.5"));

        let err: AnalysisError = MeshError::NonFiniteVertex(4).into();
        assert!(format!("{err}").contains("vertex 4"));

        let err: AnalysisError = LocatorError::Mesh(MeshError::MissingCell(2)).into();
        assert!(format!("{err}").contains("cell 2"));
    }
}
