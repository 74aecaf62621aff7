//! Bounding Volume Hierarchy over obstacle triangles.
//!
//! Uses Surface Area Heuristic (SAH) for construction.

use needlepath_math::Point3;
use needlepath_mesh::{Aabb3, Triangle};

use crate::intersect::segment_triangle;
use crate::Segment;

/// Maximum number of triangles stored in a leaf.
const LEAF_SIZE: usize = 4;

/// Number of SAH buckets per axis.
const NUM_BUCKETS: usize = 12;

/// A BVH node - either a leaf containing triangles or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Indices into the triangle list the BVH was built from.
        triangles: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } | BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy for accelerated segment-mesh queries.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build a BVH over `triangles` using SAH construction.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut tri_data: Vec<(usize, Aabb3, Point3)> = triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| {
                let aabb = tri.aabb();
                (i, aabb, aabb.center())
            })
            .collect();

        let root = if tri_data.is_empty() {
            None
        } else {
            Some(build_node(&mut tri_data))
        };

        Self { root }
    }

    /// Get a reference to the root node, if any.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Bounding box of everything in the hierarchy.
    pub fn bounds(&self) -> Option<Aabb3> {
        self.root.as_ref().map(|r| *r.aabb())
    }

    /// Depth of the tree (0 when empty, 1 for a single leaf).
    pub fn depth(&self) -> usize {
        fn node_depth(node: &BvhNode) -> usize {
            match node {
                BvhNode::Leaf { .. } => 1,
                BvhNode::Internal { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        self.root.as_ref().map_or(0, node_depth)
    }

    /// True if any triangle crosses the segment. Stops at the first hit.
    pub fn any_hit(&self, seg: &Segment, triangles: &[Triangle], tolerance: f64) -> bool {
        match &self.root {
            Some(root) => any_hit_node(root, seg, triangles, tolerance),
            None => false,
        }
    }

    /// Closest crossing along the segment as `(t, triangle index)`.
    pub fn closest_hit(
        &self,
        seg: &Segment,
        triangles: &[Triangle],
        tolerance: f64,
    ) -> Option<(f64, usize)> {
        let mut closest: Option<(f64, usize)> = None;
        let mut closest_t = f64::INFINITY;

        if let Some(root) = &self.root {
            closest_hit_node(root, seg, triangles, tolerance, &mut closest, &mut closest_t);
        }

        closest
    }
}

fn any_hit_node(node: &BvhNode, seg: &Segment, triangles: &[Triangle], tolerance: f64) -> bool {
    if seg.intersect_aabb(&node.aabb().expanded(tolerance)).is_none() {
        return false;
    }

    match node {
        BvhNode::Leaf { triangles: leaf, .. } => leaf
            .iter()
            .any(|&i| segment_triangle(seg, &triangles[i], tolerance).is_some()),
        BvhNode::Internal { left, right, .. } => {
            any_hit_node(left, seg, triangles, tolerance)
                || any_hit_node(right, seg, triangles, tolerance)
        }
    }
}

/// Trace a segment, keeping only the closest hit.
fn closest_hit_node(
    node: &BvhNode,
    seg: &Segment,
    triangles: &[Triangle],
    tolerance: f64,
    closest: &mut Option<(f64, usize)>,
    closest_t: &mut f64,
) {
    let Some((t_min, _)) = seg.intersect_aabb(&node.aabb().expanded(tolerance)) else {
        return;
    };
    // Early out if the box entry is beyond the current closest hit
    if t_min > *closest_t {
        return;
    }

    match node {
        BvhNode::Leaf { triangles: leaf, .. } => {
            for &i in leaf {
                if let Some(t) = segment_triangle(seg, &triangles[i], tolerance) {
                    // Equal t keeps the lower triangle index so results do not
                    // depend on leaf layout.
                    let better = match closest {
                        Some((best_t, best_i)) => t < *best_t || (t == *best_t && i < *best_i),
                        None => true,
                    };
                    if better {
                        *closest_t = t;
                        *closest = Some((t, i));
                    }
                }
            }
        }
        BvhNode::Internal { left, right, .. } => {
            // Test children in order of box distance
            let expanded_left = left.aabb().expanded(tolerance);
            let expanded_right = right.aabb().expanded(tolerance);
            let left_t = seg.intersect_aabb(&expanded_left).map(|(t, _)| t);
            let right_t = seg.intersect_aabb(&expanded_right).map(|(t, _)| t);

            match (left_t, right_t) {
                (Some(lt), Some(rt)) => {
                    if lt <= rt {
                        closest_hit_node(left, seg, triangles, tolerance, closest, closest_t);
                        closest_hit_node(right, seg, triangles, tolerance, closest, closest_t);
                    } else {
                        closest_hit_node(right, seg, triangles, tolerance, closest, closest_t);
                        closest_hit_node(left, seg, triangles, tolerance, closest, closest_t);
                    }
                }
                (Some(_), None) => {
                    closest_hit_node(left, seg, triangles, tolerance, closest, closest_t);
                }
                (None, Some(_)) => {
                    closest_hit_node(right, seg, triangles, tolerance, closest, closest_t);
                }
                (None, None) => {}
            }
        }
    }
}

/// Build a BVH node recursively using SAH.
fn build_node(tri_data: &mut [(usize, Aabb3, Point3)]) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in tri_data.iter() {
        bounds.include_aabb(aabb);
    }

    if tri_data.len() <= LEAF_SIZE {
        return BvhNode::Leaf {
            aabb: bounds,
            triangles: tri_data.iter().map(|(id, _, _)| *id).collect(),
        };
    }

    let mut mid = match find_best_split(tri_data, &bounds) {
        Some((axis, pos)) => partition_triangles(tri_data, axis, pos),
        None => 0,
    };

    // Fall back to a median split when SAH cannot separate the centroids
    if mid == 0 || mid == tri_data.len() {
        mid = tri_data.len() / 2;
    }

    let (left_data, right_data) = tri_data.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_data)),
        right: Box::new(build_node(right_data)),
    }
}

/// Find the best split axis and position using SAH.
fn find_best_split(tri_data: &[(usize, Aabb3, Point3)], bounds: &Aabb3) -> Option<(usize, f64)> {
    let mut centroid_bounds = Aabb3::empty();
    for (_, _, c) in tri_data {
        centroid_bounds.include_point(c);
    }
    let extent = centroid_bounds.extent();
    let total_area = bounds.surface_area();

    let mut best: Option<(usize, f64)> = None;
    let mut best_cost = f64::INFINITY;

    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = centroid_bounds.min[axis];

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        for (_, aabb, centroid) in tri_data {
            let b = ((centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(aabb);
        }

        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                left_bounds.include_aabb(&bucket_bounds[i]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                right_bounds.include_aabb(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = if total_area > 0.0 {
                0.125
                    + left_bounds.surface_area() / total_area * left_count as f64
                    + right_bounds.surface_area() / total_area * right_count as f64
            } else {
                (left_count.max(right_count)) as f64
            };

            if cost < best_cost {
                best_cost = cost;
                best = Some((
                    axis,
                    axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent,
                ));
            }
        }
    }

    best
}

/// Partition triangles by centroid along an axis.
fn partition_triangles(tri_data: &mut [(usize, Aabb3, Point3)], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = tri_data.len();

    while left < right {
        if tri_data[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            tri_data.swap(left, right);
        }
    }

    left
}
