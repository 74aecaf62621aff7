//! Triangle primitive extracted from a mesh cell.

use needlepath_math::{centroid3, Point3, Vec3};

use crate::bbox::Aabb3;

/// A triangle with owned vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
}

impl Triangle {
    /// Create a triangle from three points.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Non-normalized face normal; its length is twice the area.
    pub fn scaled_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, or `None` for a degenerate triangle.
    pub fn normal(&self) -> Option<Vec3> {
        let n = self.scaled_normal();
        let len = n.norm();
        if len > f64::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Triangle area.
    pub fn area(&self) -> f64 {
        0.5 * self.scaled_normal().norm()
    }

    /// Centroid (mean of the three vertices).
    pub fn centroid(&self) -> Point3 {
        centroid3(&self.v0, &self.v1, &self.v2)
    }

    /// Bounding box of the three vertices.
    pub fn aabb(&self) -> Aabb3 {
        let mut b = Aabb3::empty();
        b.include_point(&self.v0);
        b.include_point(&self.v1);
        b.include_point(&self.v2);
        b
    }

    /// Closest point on the triangle to `p`.
    ///
    /// Region-based projection (Ericson, *Real-Time Collision Detection* 5.1.5).
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }
}
