#![warn(missing_docs)]

//! Math types for the needlepath trajectory engine.
//!
//! Thin wrappers around nalgebra providing the point, vector and
//! tolerance types shared by the mesh, locator and analysis crates.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Linear interpolation between two points.
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
#[inline]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm()
}

/// Arithmetic mean of three points.
#[inline]
pub fn centroid3(a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    Point3::new(
        (a.x + b.x + c.x) / 3.0,
        (a.y + b.y + c.y) / 3.0,
        (a.z + b.z + c.z) / 3.0,
    )
}

/// Tolerance used for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear distance tolerance in mesh units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (0.001 length units), wide enough to absorb
    /// floating-point noise on coincident surfaces.
    pub const DEFAULT: Self = Self { linear: 1e-3 };

    /// Create a tolerance with the given linear slack.
    pub const fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_endpoints() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-4.0, 6.0, 0.5);
        assert!((lerp(&a, &b, 0.0) - a).norm() < 1e-12);
        assert!((lerp(&a, &b, 1.0) - b).norm() < 1e-12);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, -10.0, 4.0);
        let m = lerp(&a, &b, 0.5);
        assert_relative_eq!(m.x, 5.0);
        assert_relative_eq!(m.y, -5.0);
        assert_relative_eq!(m.z, 2.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(4.0, 5.0, 1.0);
        assert_relative_eq!(distance(&a, &b), 5.0);
        assert_relative_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_centroid3() {
        let c = centroid3(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(3.0, 0.0, 0.0),
            &Point3::new(0.0, 3.0, 0.0),
        );
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert!(c.z.abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-4, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.01, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }

}
