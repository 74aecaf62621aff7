//! Segment-triangle crossing test.

use needlepath_mesh::Triangle;

use crate::Segment;

/// Relative threshold below which a segment counts as parallel to a plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Test whether `seg` crosses `tri`, allowing `tolerance` of slack.
///
/// The segment must meet the triangle's plane within its own extent; the
/// crossing point then counts as a hit when it lies within `tolerance`
/// (absolute distance) of the triangle. Segments parallel to the plane
/// never hit, and neither do degenerate triangles.
///
/// Returns the distance from the segment start to the crossing point.
pub fn segment_triangle(seg: &Segment, tri: &Triangle, tolerance: f64) -> Option<f64> {
    let n = tri.normal()?;

    let d = seg.delta();
    let denom = n.dot(&d);
    if denom.abs() <= PARALLEL_EPSILON * seg.length {
        return None;
    }

    let s = n.dot(&(tri.v0 - seg.start)) / denom;
    if !(0.0..=1.0).contains(&s) {
        return None;
    }

    let p = seg.start + d * s;
    let q = tri.closest_point(&p);
    if (p - q).norm() <= tolerance {
        Some(s * seg.length)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use needlepath_math::Point3;

    fn floor() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        )
    }

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment {
        Segment::new(Point3::new(a[0], a[1], a[2]), Point3::new(b[0], b[1], b[2])).unwrap()
    }

    #[test]
    fn test_crossing_hit() {
        let t = segment_triangle(&seg([0.5, 0.5, 1.0], [0.5, 0.5, -1.0]), &floor(), 1e-3);
        assert!((t.unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_crossing_miss() {
        let t = segment_triangle(&seg([5.0, 5.0, 1.0], [5.0, 5.0, -1.0]), &floor(), 1e-3);
        assert!(t.is_none());
    }

    #[test]
    fn test_segment_ends_before_plane() {
        let t = segment_triangle(&seg([0.5, 0.5, 2.0], [0.5, 0.5, 1.0]), &floor(), 1e-3);
        assert!(t.is_none());
    }

    #[test]
    fn test_tolerance_slack_near_edge() {
        // Crosses the plane 0.0005 outside the y = 0 edge.
        let s = seg([0.5, -0.0005, 1.0], [0.5, -0.0005, -1.0]);
        assert!(segment_triangle(&s, &floor(), 1e-3).is_some());
        assert!(segment_triangle(&s, &floor(), 1e-4).is_none());
    }

    #[test]
    fn test_parallel_segment_never_hits() {
        let t = segment_triangle(&seg([0.0, 0.5, 0.0], [1.0, 0.5, 0.0]), &floor(), 1e-3);
        assert!(t.is_none());
    }

    #[test]
    fn test_endpoint_on_surface_counts() {
        let t = segment_triangle(&seg([0.5, 0.5, 1.0], [0.5, 0.5, 0.0]), &floor(), 1e-3);
        assert!((t.unwrap() - 1.0).abs() < 1e-10);
    }
}
