//! Area-weighted, distance-discounted accessibility scoring.

use std::sync::atomic::{AtomicBool, Ordering};

use needlepath_locator::SpatialIndex;
use needlepath_math::{distance, Point3};
use needlepath_mesh::Mesh;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::params::AnalysisParams;
use crate::target::check_point;

/// Scalar value marking a cell (or vertex) that offers no usable entry.
pub const INACCESSIBLE: f64 = -1.0;

/// Outcome of scoring a skin surface against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityResult {
    /// Accessibility score: equal to `accessible_area`, in squared length units.
    pub score: f64,
    /// Sum of `area * (cutoff - d) / cutoff` over visible cells nearer than the cutoff.
    pub accessible_area: f64,
    /// Total area of occluded cells.
    pub inaccessible_area: f64,
    /// Distance from the target to the nearest visible centroid, or `-1`
    /// when no cell is visible.
    pub minimum_distance: f64,
    /// Centroid achieving `minimum_distance`.
    pub minimum_distance_point: Option<Point3>,
    /// Per-cell scalar: `d + bias` for accessible cells, `-1` otherwise.
    pub cell_scalars: Vec<f64>,
    /// Cells with a clear line to the target (including those beyond the cutoff).
    pub cells_visible: usize,
    /// Cells whose line to the target is blocked.
    pub cells_occluded: usize,
    /// Visible cells at or beyond the cutoff; they count toward neither area.
    pub cells_beyond_cutoff: usize,
    /// Cells skipped as non-triangular or coincident with the target.
    pub cells_skipped: usize,
}

impl AccessibilityResult {
    /// Result for a skin mesh without cells.
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            accessible_area: 0.0,
            inaccessible_area: 0.0,
            minimum_distance: INACCESSIBLE,
            minimum_distance_point: None,
            cell_scalars: Vec::new(),
            cells_visible: 0,
            cells_occluded: 0,
            cells_beyond_cutoff: 0,
            cells_skipped: 0,
        }
    }

    /// True if at least one cell is visible from the target.
    pub fn has_visible_cells(&self) -> bool {
        self.minimum_distance_point.is_some()
    }

    /// `accessible_area / (accessible_area + inaccessible_area)`, or 0 when
    /// both are zero. Reported alongside `score`, never in place of it.
    pub fn normalized_score(&self) -> f64 {
        let total = self.accessible_area + self.inaccessible_area;
        if total > 0.0 {
            self.accessible_area / total
        } else {
            0.0
        }
    }

    /// Per-vertex scalar field derived from [`cell_scalars`](Self::cell_scalars):
    /// the mean over adjacent accessible cells, or `-1` when none is accessible.
    pub fn vertex_scalars(&self, mesh: &Mesh) -> Vec<f64> {
        mesh.vertex_cells()
            .iter()
            .map(|cells| {
                let (sum, count) = cells
                    .iter()
                    .filter_map(|&c| self.cell_scalars.get(c).copied())
                    .filter(|&s| s != INACCESSIBLE)
                    .fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
                if count == 0 {
                    INACCESSIBLE
                } else {
                    sum / count as f64
                }
            })
            .collect()
    }
}

impl std::fmt::Display for AccessibilityResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accessibility:")?;
        writeln!(f, "  Score: {:.3}", self.score)?;
        writeln!(f, "  Inaccessible area: {:.3}", self.inaccessible_area)?;
        writeln!(f, "  Normalized score: {:.3}", self.normalized_score())?;
        if self.has_visible_cells() {
            writeln!(f, "  Minimum distance: {:.3}", self.minimum_distance)?;
        } else {
            writeln!(f, "  Minimum distance: none visible")?;
        }
        writeln!(
            f,
            "  Cells: {} visible, {} occluded, {} beyond cutoff, {} skipped",
            self.cells_visible, self.cells_occluded, self.cells_beyond_cutoff, self.cells_skipped
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum CellOutcome {
    Skipped,
    Occluded { area: f64 },
    Visible { area: f64, distance: f64, centroid: Point3 },
}

/// Score how accessible `target` is from the triangles of `skin`.
///
/// See [`calc_approach_score_with_cancel`] for the algorithm.
pub fn calc_approach_score(
    target: &Point3,
    index: &SpatialIndex,
    skin: &Mesh,
    params: &AnalysisParams,
) -> Result<AccessibilityResult> {
    calc_approach_score_with_cancel(target, index, skin, params, &AtomicBool::new(false))
}

/// Score how accessible `target` is, checking `cancel` before each cell.
///
/// For every triangular cell the centroid's line to the target is tested.
/// Occluded cells add their area to `inaccessible_area`. Visible cells
/// nearer than `params.cutoff` add `area * (cutoff - d) / cutoff` to
/// `accessible_area`; visible cells at or beyond the cutoff add to neither.
/// Non-triangular cells, and cells whose centroid coincides with the target,
/// are logged and skipped.
///
/// Cells are evaluated in parallel; sums and the minimum distance are then
/// reduced in cell order so the result does not depend on scheduling.
///
/// Returns [`AnalysisError::Cancelled`] if `cancel` is set during the run,
/// and [`AnalysisError::InvalidTarget`] for a target with non-finite
/// coordinates.
pub fn calc_approach_score_with_cancel(
    target: &Point3,
    index: &SpatialIndex,
    skin: &Mesh,
    params: &AnalysisParams,
    cancel: &AtomicBool,
) -> Result<AccessibilityResult> {
    params.validate()?;
    check_point(target)?;
    skin.validate()?;

    let skin = skin.with_normals();
    let tol = params.linear_tolerance();

    info!(
        cells = skin.num_cells(),
        cutoff = params.cutoff,
        "computing approach score"
    );

    let outcomes: Option<Vec<CellOutcome>> = (0..skin.num_cells())
        .into_par_iter()
        .map(|cell| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let tri = match skin.triangle(cell) {
                Ok(tri) => tri,
                Err(err) => {
                    warn!(cell, %err, "skipping skin cell");
                    return Some(CellOutcome::Skipped);
                }
            };
            let centroid = tri.centroid();
            if tol.points_equal(&centroid, target) {
                warn!(cell, "cell centroid coincides with target; skipping");
                return Some(CellOutcome::Skipped);
            }
            let area = tri.area();
            if index.intersects(&centroid, target, params.tolerance) {
                Some(CellOutcome::Occluded { area })
            } else {
                Some(CellOutcome::Visible {
                    area,
                    distance: distance(&centroid, target),
                    centroid,
                })
            }
        })
        .collect();

    let Some(outcomes) = outcomes else {
        info!("approach score cancelled");
        return Err(AnalysisError::Cancelled);
    };
    if cancel.load(Ordering::Relaxed) {
        return Err(AnalysisError::Cancelled);
    }

    let mut result = AccessibilityResult::empty();
    result.cell_scalars.reserve(outcomes.len());
    let mut min_distance = f64::INFINITY;

    for outcome in outcomes {
        let scalar = match outcome {
            CellOutcome::Skipped => {
                result.cells_skipped += 1;
                INACCESSIBLE
            }
            CellOutcome::Occluded { area } => {
                result.cells_occluded += 1;
                result.inaccessible_area += area;
                INACCESSIBLE
            }
            CellOutcome::Visible {
                area,
                distance,
                centroid,
            } => {
                result.cells_visible += 1;
                if distance < min_distance {
                    min_distance = distance;
                    result.minimum_distance_point = Some(centroid);
                }
                if distance < params.cutoff {
                    result.accessible_area += area * (params.cutoff - distance) / params.cutoff;
                    distance + params.visualization_bias
                } else {
                    result.cells_beyond_cutoff += 1;
                    INACCESSIBLE
                }
            }
        };
        result.cell_scalars.push(scalar);
    }

    if result.minimum_distance_point.is_some() {
        result.minimum_distance = min_distance;
    }
    result.score = result.accessible_area;

    info!(
        score = result.score,
        visible = result.cells_visible,
        occluded = result.cells_occluded,
        skipped = result.cells_skipped,
        "approach score complete"
    );

    Ok(result)
}
