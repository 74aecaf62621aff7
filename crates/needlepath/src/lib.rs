#![warn(missing_docs)]

//! Needle trajectory visibility and accessibility analysis.
//!
//! Given a target point inside a body, an obstacle surface to avoid and a
//! skin surface to enter through, this crate finds every skin location with
//! an unobstructed straight line to the target and scores how accessible the
//! target is overall.
//!
//! # Architecture
//!
//! - [`compute_paths`] - Per-vertex visibility sweep producing a [`PathSet`]
//! - [`calc_approach_score`] - Area-weighted, distance-discounted scoring
//! - [`single_path`], [`virtual_path`], [`path_length`] - Path geometry helpers
//! - [`TargetProvider`] - Point, surface and labelmap targets
//! - [`analyze`] - Single-call front end building the obstacle index
//!
//! # Example
//!
//! ```
//! use needlepath::{analyze, AnalysisParams};
//! use needlepath_math::Point3;
//! use needlepath_mesh::Mesh;
//!
//! let skin = Mesh::from_triangles(
//!     vec![
//!         Point3::new(-5.0, -5.0, 20.0),
//!         Point3::new(5.0, -5.0, 20.0),
//!         Point3::new(0.0, 5.0, 20.0),
//!     ],
//!     &[[0, 1, 2]],
//! );
//! let result = analyze(&Point3::origin(), &Mesh::new(), &skin, &AnalysisParams::default())?;
//!
//! println!("Paths: {}", result.paths.len());
//! println!("Score: {:.1}", result.accessibility.score);
//! # Ok::<(), needlepath::AnalysisError>(())
//! ```

pub mod error;
pub mod params;
pub mod path;
pub mod score;
pub mod target;
mod visibility;

pub use error::{AnalysisError, Result};
pub use needlepath_locator::SpatialIndex;
pub use params::AnalysisParams;
pub use path::{path_length, single_path, virtual_path, Path, PathSet};
pub use score::{
    calc_approach_score, calc_approach_score_with_cancel, AccessibilityResult, INACCESSIBLE,
};
pub use target::{
    analyze_targets, PointTarget, SurfaceTarget, TargetAnalysis, TargetProvider, TargetSample,
    VoxelTarget,
};
pub use visibility::compute_paths;

use needlepath_math::Point3;
use needlepath_mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Paths and accessibility for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Unobstructed paths from skin vertices to the target.
    pub paths: PathSet,
    /// Accessibility of the target from the skin cells.
    pub accessibility: AccessibilityResult,
}

/// Build an index over `obstacle` and run both sweeps for `target`.
///
/// Hosts analyzing several targets against the same obstacle should build a
/// [`SpatialIndex`] once and call [`compute_paths`] and
/// [`calc_approach_score`] directly.
pub fn analyze(
    target: &Point3,
    obstacle: &Mesh,
    skin: &Mesh,
    params: &AnalysisParams,
) -> Result<Analysis> {
    params.validate()?;
    PointTarget(*target).validate()?;
    let index = SpatialIndex::build(obstacle)?;

    Ok(Analysis {
        paths: compute_paths(target, &index, skin, params)?,
        accessibility: calc_approach_score(target, &index, skin, params)?,
    })
}
