//! JSON report layout.

use needlepath::{AccessibilityResult, AnalysisParams, Path, PathSet, TargetAnalysis};
use needlepath_math::Point3;
use serde::Serialize;

/// Path statistics with the `-1` index convention hosts expect.
#[derive(Debug, Clone, Serialize)]
pub struct PathSummary {
    pub count: usize,
    pub candidates: usize,
    pub skipped_coincident: usize,
    pub shortest_index: i64,
    pub longest_index: i64,
    pub shortest_length: Option<f64>,
    pub longest_length: Option<f64>,
    pub approachable_ratio: f64,
}

impl From<&PathSet> for PathSummary {
    fn from(paths: &PathSet) -> Self {
        Self {
            count: paths.len(),
            candidates: paths.candidates,
            skipped_coincident: paths.skipped_coincident,
            shortest_index: paths.shortest_index_raw(),
            longest_index: paths.longest_index_raw(),
            shortest_length: paths.shortest_length(),
            longest_length: paths.longest_length(),
            approachable_ratio: paths.approachable_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub point: Point3,
    pub paths: PathSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_list: Option<Vec<Path>>,
    pub normalized_score: f64,
    pub accessibility: AccessibilityResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub target: String,
    pub params: AnalysisParams,
    pub obstacle_triangles: usize,
    pub mean_paths_per_target: f64,
    pub mean_score: f64,
    pub samples: Vec<SampleReport>,
}

impl Report {
    pub fn new(
        analysis: TargetAnalysis,
        params: AnalysisParams,
        obstacle_triangles: usize,
        include_paths: bool,
    ) -> Self {
        let samples = analysis
            .samples
            .into_iter()
            .map(|sample| SampleReport {
                point: sample.point,
                paths: PathSummary::from(&sample.paths),
                path_list: include_paths.then(|| sample.paths.paths.clone()),
                normalized_score: sample.accessibility.normalized_score(),
                accessibility: sample.accessibility,
            })
            .collect();

        Self {
            target: analysis.description,
            params,
            obstacle_triangles,
            mean_paths_per_target: analysis.mean_paths_per_target,
            mean_score: analysis.mean_score,
            samples,
        }
    }
}
