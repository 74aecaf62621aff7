//! Candidate trajectories and the helpers hosts use to explore them.

use needlepath_math::{distance, lerp, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// One straight-line candidate trajectory from an entry point to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Point the needle must reach.
    pub target: Point3,
    /// Entry point on the skin surface.
    pub entry: Point3,
}

impl Path {
    /// Create a path.
    pub fn new(target: Point3, entry: Point3) -> Self {
        Self { target, entry }
    }

    /// Euclidean length of the path.
    pub fn length(&self) -> f64 {
        distance(&self.target, &self.entry)
    }

    /// The same path with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self {
            target: self.entry,
            entry: self.target,
        }
    }
}

/// Unobstructed paths found by [`compute_paths`](crate::compute_paths), in
/// skin-vertex order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSet {
    /// Target shared by every path.
    pub target: Point3,
    /// Accepted paths.
    pub paths: Vec<Path>,
    /// Skin vertex each path starts from.
    pub vertex_indices: Vec<usize>,
    /// Index of the shortest path. First encountered wins ties.
    pub shortest_index: Option<usize>,
    /// Index of the longest path. First encountered wins ties.
    pub longest_index: Option<usize>,
    /// Number of skin vertices examined.
    pub candidates: usize,
    /// Skin vertices skipped because they coincide with the target.
    pub skipped_coincident: usize,
}

impl PathSet {
    /// An empty set for `target`.
    pub fn empty(target: Point3) -> Self {
        Self {
            target,
            paths: Vec::new(),
            vertex_indices: Vec::new(),
            shortest_index: None,
            longest_index: None,
            candidates: 0,
            skipped_coincident: 0,
        }
    }

    /// Number of accepted paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if no path was accepted (the target is fully occluded).
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    /// Iterate over accepted paths.
    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Shortest accepted path.
    pub fn shortest(&self) -> Option<&Path> {
        self.shortest_index.and_then(|i| self.paths.get(i))
    }

    /// Longest accepted path.
    pub fn longest(&self) -> Option<&Path> {
        self.longest_index.and_then(|i| self.paths.get(i))
    }

    /// Length of the shortest path.
    pub fn shortest_length(&self) -> Option<f64> {
        self.shortest().map(Path::length)
    }

    /// Length of the longest path.
    pub fn longest_length(&self) -> Option<f64> {
        self.longest().map(Path::length)
    }

    /// Shortest index with `-1` standing in for "none".
    pub fn shortest_index_raw(&self) -> i64 {
        raw_index(self.shortest_index)
    }

    /// Longest index with `-1` standing in for "none".
    pub fn longest_index_raw(&self) -> i64 {
        raw_index(self.longest_index)
    }

    /// Fraction of examined skin vertices that have a clear path.
    pub fn approachable_ratio(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            self.paths.len() as f64 / self.candidates as f64
        }
    }

    /// Flatten into `[target, entry, target, entry, ...]` for line-segment
    /// rendering.
    pub fn to_polyline(&self) -> Vec<Point3> {
        self.paths
            .iter()
            .flat_map(|p| [p.target, p.entry])
            .collect()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

fn raw_index(index: Option<usize>) -> i64 {
    index.map_or(-1, |i| i as i64)
}

/// Path at `index`, or [`AnalysisError::PathIndexOutOfRange`].
pub fn single_path(paths: &PathSet, index: usize) -> Result<Path> {
    paths
        .get(index)
        .copied()
        .ok_or(AnalysisError::PathIndexOutOfRange {
            index,
            len: paths.len(),
        })
}

/// A synthetic path whose entry slides from path `index`'s entry point
/// (`t = 0`) toward the target (`t = 1`).
pub fn virtual_path(paths: &PathSet, index: usize, t: f64) -> Result<Path> {
    if !(0.0..=1.0).contains(&t) {
        return Err(AnalysisError::InvalidInterpolation(t));
    }
    let path = single_path(paths, index)?;
    Ok(Path::new(path.target, lerp(&path.entry, &path.target, t)))
}

/// Euclidean length of `path`.
pub fn path_length(path: &Path) -> f64 {
    path.length()
}
