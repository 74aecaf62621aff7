//! Per-vertex visibility sweep over the skin surface.

use needlepath_locator::SpatialIndex;
use needlepath_math::Point3;
use needlepath_mesh::Mesh;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::Result;
use crate::params::AnalysisParams;
use crate::path::{Path, PathSet};
use crate::target::check_point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexOutcome {
    Visible,
    Occluded,
    Coincident,
}

/// Find every skin vertex with an unobstructed straight line to `target`.
///
/// Vertices are visited in mesh order and the returned [`PathSet`] keeps
/// that order. The shortest and longest paths are tracked with strict
/// comparisons, so the first path encountered wins a tie.
///
/// A vertex lying within `params.tolerance` of the target has no defined
/// direction; it is logged, counted in
/// [`PathSet::skipped_coincident`] and left out. A target with non-finite
/// coordinates is rejected with
/// [`AnalysisError::InvalidTarget`](crate::AnalysisError::InvalidTarget).
///
/// # Example
///
/// ```
/// use needlepath::{compute_paths, AnalysisParams};
/// use needlepath_locator::SpatialIndex;
/// use needlepath_math::Point3;
/// use needlepath_mesh::Mesh;
///
/// let skin = Mesh::from_triangles(
///     vec![
///         Point3::new(0.0, 0.0, 10.0),
///         Point3::new(5.0, 0.0, 10.0),
///         Point3::new(0.0, 5.0, 10.0),
///     ],
///     &[[0, 1, 2]],
/// );
/// let index = SpatialIndex::build(&Mesh::new()).unwrap();
/// let target = Point3::origin();
///
/// let paths = compute_paths(&target, &index, &skin, &AnalysisParams::default()).unwrap();
/// assert_eq!(paths.len(), 3);
/// assert_eq!(paths.shortest_index, Some(0));
/// ```
pub fn compute_paths(
    target: &Point3,
    index: &SpatialIndex,
    skin: &Mesh,
    params: &AnalysisParams,
) -> Result<PathSet> {
    params.validate()?;
    check_point(target)?;
    skin.validate()?;

    // Normals are recomputed on a private copy; vertex order is preserved.
    let skin = skin.with_normals();
    let tol = params.linear_tolerance();

    info!(
        vertices = skin.num_vertices(),
        obstacle_triangles = index.num_triangles(),
        "computing visible paths"
    );

    let outcomes: Vec<VertexOutcome> = skin
        .vertices
        .par_iter()
        .map(|v| {
            if tol.points_equal(v, target) {
                VertexOutcome::Coincident
            } else if index.intersects(v, target, params.tolerance) {
                VertexOutcome::Occluded
            } else {
                VertexOutcome::Visible
            }
        })
        .collect();

    let mut set = PathSet::empty(*target);
    set.candidates = outcomes.len();
    let mut shortest = f64::INFINITY;
    let mut longest = f64::NEG_INFINITY;

    for (vertex, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            VertexOutcome::Occluded => {}
            VertexOutcome::Coincident => {
                warn!(vertex, "skin vertex coincides with target; skipping");
                set.skipped_coincident += 1;
            }
            VertexOutcome::Visible => {
                let path = Path::new(*target, skin.vertices[vertex]);
                let length = path.length();
                let position = set.paths.len();
                if length < shortest {
                    shortest = length;
                    set.shortest_index = Some(position);
                }
                if length > longest {
                    longest = length;
                    set.longest_index = Some(position);
                }
                set.paths.push(path);
                set.vertex_indices.push(vertex);
            }
        }
    }

    info!(
        paths = set.len(),
        candidates = set.candidates,
        skipped = set.skipped_coincident,
        "visible path sweep complete"
    );

    Ok(set)
}
