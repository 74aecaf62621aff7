//! Line segment representation and segment-box tests.

use needlepath_math::{Dir3, Point3, Vec3};
use needlepath_mesh::Aabb3;

/// A finite line segment between two distinct points.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Start point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
    /// Unit direction from start to end.
    pub direction: Dir3,
    /// Distance from start to end.
    pub length: f64,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Segment {
    /// Create a segment from `start` to `end`.
    ///
    /// Returns `None` when the endpoints coincide, since a zero-length
    /// segment has no direction.
    pub fn new(start: Point3, end: Point3) -> Option<Self> {
        let delta = end - start;
        let length = delta.norm();
        if length <= f64::EPSILON || !length.is_finite() {
            return None;
        }
        let dir = Dir3::new_unchecked(delta / length);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            usize::from(inv.x < 0.0),
            usize::from(inv.y < 0.0),
            usize::from(inv.z < 0.0),
        ];
        Some(Self {
            start,
            end,
            direction: dir,
            length,
            inv_direction: inv,
            sign,
        })
    }

    /// Point at distance `t` from the start.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.start + t * self.direction.as_ref()
    }

    /// Full vector from start to end.
    #[inline]
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Test segment-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))`, distances along the segment clipped
    /// to `[0, length]`, or `None` if the segment misses the box.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.start.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.start.x) * self.inv_direction.x;

        let mut t_min = tx1;
        let mut t_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.start.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.start.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.start.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.start.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        let t_min = t_min.max(0.0);
        let t_max = t_max.min(self.length);

        if t_max >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}
