//! Spatial index answering segment-crossing queries against an obstacle mesh.

use needlepath_math::Point3;
use needlepath_mesh::{Aabb3, Mesh, MeshError, Triangle};
use tracing::{debug, warn};

use crate::bvh::Bvh;
use crate::error::Result;
use crate::Segment;

/// A crossing found by [`SpatialIndex::first_hit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Distance from the segment start to the crossing.
    pub t: f64,
    /// Crossing point on the segment.
    pub point: Point3,
    /// Cell of the obstacle mesh that was crossed.
    pub cell_id: usize,
}

/// Immutable segment-intersection index over a snapshot of an obstacle mesh.
///
/// An index built from a mesh with no triangles is valid and empty: it
/// reports every segment as unobstructed. Rebuild the index whenever the
/// obstacle mesh changes; there is no incremental update.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    bvh: Bvh,
    triangles: Vec<Triangle>,
    /// Obstacle cell id for each entry in `triangles`.
    cell_ids: Vec<usize>,
    skipped_cells: usize,
}

impl SpatialIndex {
    /// Build an index over the triangular cells of `mesh`.
    ///
    /// Invalid vertex references or non-finite coordinates fail the whole
    /// build. Non-triangular cells are logged and left out.
    pub fn build(mesh: &Mesh) -> Result<Self> {
        mesh.validate()?;

        let mut triangles = Vec::with_capacity(mesh.num_cells());
        let mut cell_ids = Vec::with_capacity(mesh.num_cells());
        let mut skipped_cells = 0;

        for (cell, tri) in mesh.triangles() {
            match tri {
                Ok(tri) => {
                    triangles.push(tri);
                    cell_ids.push(cell);
                }
                Err(err @ MeshError::NonTriangularCell { .. }) => {
                    warn!(cell, %err, "skipping obstacle cell");
                    skipped_cells += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        let bvh = Bvh::build(&triangles);

        if triangles.is_empty() {
            debug!("obstacle mesh has no triangles; no segment will be reported as occluded");
        } else {
            debug!(
                triangles = triangles.len(),
                skipped_cells,
                depth = bvh.depth(),
                "built obstacle index"
            );
        }

        Ok(Self {
            bvh,
            triangles,
            cell_ids,
            skipped_cells,
        })
    }

    /// True if the segment from `a` to `b` crosses the obstacle surface
    /// within `tolerance`.
    ///
    /// `a` and `b` must be distinct; coincident endpoints are reported as
    /// unobstructed. A segment lying in the plane of an obstacle triangle
    /// never hits that triangle, even where it passes across it.
    pub fn intersects(&self, a: &Point3, b: &Point3, tolerance: f64) -> bool {
        match Segment::new(*a, *b) {
            Some(seg) => self.bvh.any_hit(&seg, &self.triangles, tolerance),
            None => false,
        }
    }

    /// The crossing nearest to `a` on the segment from `a` to `b`, if any.
    pub fn first_hit(&self, a: &Point3, b: &Point3, tolerance: f64) -> Option<SegmentHit> {
        let seg = Segment::new(*a, *b)?;
        self.bvh
            .closest_hit(&seg, &self.triangles, tolerance)
            .map(|(t, i)| SegmentHit {
                t,
                point: seg.at(t),
                cell_id: self.cell_ids[i],
            })
    }

    /// True if the index holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of indexed triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of obstacle cells left out because they were not triangles.
    pub fn skipped_cells(&self) -> usize {
        self.skipped_cells
    }

    /// Bounds of the indexed triangles.
    pub fn bounds(&self) -> Option<Aabb3> {
        self.bvh.bounds()
    }

    /// Depth of the underlying hierarchy.
    pub fn depth(&self) -> usize {
        self.bvh.depth()
    }
}
