//! Target providers and multi-target analysis.
//!
//! A target is usually a single point, but a lesion can also be given as a
//! surface mesh or as a labelled region of a voxel volume. Every provider
//! reduces to a list of sample points, and [`analyze_targets`] runs both
//! sweeps for each sample.

use needlepath_locator::SpatialIndex;
use needlepath_math::Point3;
use needlepath_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::params::AnalysisParams;
use crate::path::PathSet;
use crate::score::{calc_approach_score, AccessibilityResult};
use crate::visibility::compute_paths;

/// Source of target sample points.
pub trait TargetProvider {
    /// Sample points, in a stable order.
    fn sample_points(&self) -> Vec<Point3>;

    /// Short human-readable description for logs and reports.
    fn describe(&self) -> String;

    /// Check the provider before sampling.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A single target point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointTarget(pub Point3);

impl TargetProvider for PointTarget {
    fn sample_points(&self) -> Vec<Point3> {
        vec![self.0]
    }

    fn describe(&self) -> String {
        format!("point ({:.3}, {:.3}, {:.3})", self.0.x, self.0.y, self.0.z)
    }

    fn validate(&self) -> Result<()> {
        check_point(&self.0)
    }
}

/// Reject target points with NaN or infinite coordinates.
pub(crate) fn check_point(p: &Point3) -> Result<()> {
    if p.x.is_finite() && p.y.is_finite() && p.z.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidTarget(
            "target point has non-finite coordinates".into(),
        ))
    }
}

/// Every vertex of a target surface mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTarget(pub Mesh);

impl TargetProvider for SurfaceTarget {
    fn sample_points(&self) -> Vec<Point3> {
        self.0.with_normals().vertices
    }

    fn describe(&self) -> String {
        format!(
            "surface ({} vertices, {} cells)",
            self.0.num_vertices(),
            self.0.num_cells()
        )
    }

    fn validate(&self) -> Result<()> {
        self.0.validate()?;
        Ok(())
    }
}

/// Labelled region of a voxel volume.
///
/// `labels` holds one value per voxel in x-fastest order, so voxel
/// `(i, j, k)` is at `i + dims[0] * (j + dims[1] * k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelTarget {
    /// Center of voxel `(0, 0, 0)`.
    pub origin: Point3,
    /// Voxel size along each axis.
    pub spacing: [f64; 3],
    /// Voxel counts along each axis.
    pub dims: [usize; 3],
    /// Per-voxel labels.
    pub labels: Vec<u32>,
    /// Label that marks the target region.
    #[serde(default = "default_label")]
    pub label: u32,
}

fn default_label() -> u32 {
    1
}

impl VoxelTarget {
    /// Create a voxel target, checking that the volume is consistent.
    pub fn new(
        origin: Point3,
        spacing: [f64; 3],
        dims: [usize; 3],
        labels: Vec<u32>,
        label: u32,
    ) -> Result<Self> {
        let target = Self {
            origin,
            spacing,
            dims,
            labels,
            label,
        };
        target.check()?;
        Ok(target)
    }

    fn check(&self) -> Result<()> {
        if self.spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(AnalysisError::InvalidTarget(
                "voxel spacing must be positive and finite".into(),
            ));
        }
        let expected = self.dims.iter().product::<usize>();
        if self.labels.len() != expected {
            return Err(AnalysisError::InvalidTarget(format!(
                "expected {expected} voxel labels for dims {:?}, got {}",
                self.dims,
                self.labels.len()
            )));
        }
        Ok(())
    }

    /// Number of voxels carrying the target label.
    pub fn num_labelled(&self) -> usize {
        self.labels.iter().filter(|&&l| l == self.label).count()
    }
}

impl TargetProvider for VoxelTarget {
    fn sample_points(&self) -> Vec<Point3> {
        let [nx, ny, _] = self.dims;
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == self.label)
            .map(|(n, _)| {
                let i = n % nx;
                let j = (n / nx) % ny;
                let k = n / (nx * ny);
                Point3::new(
                    self.origin.x + i as f64 * self.spacing[0],
                    self.origin.y + j as f64 * self.spacing[1],
                    self.origin.z + k as f64 * self.spacing[2],
                )
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!(
            "labelmap {}x{}x{} (label {}, {} voxels)",
            self.dims[0],
            self.dims[1],
            self.dims[2],
            self.label,
            self.num_labelled()
        )
    }

    fn validate(&self) -> Result<()> {
        self.check()
    }
}

/// Results for one target sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSample {
    /// The sample point.
    pub point: Point3,
    /// Unobstructed paths to this sample.
    pub paths: PathSet,
    /// Accessibility of this sample.
    pub accessibility: AccessibilityResult,
}

/// Results for every sample of a target provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAnalysis {
    /// Provider description.
    pub description: String,
    /// Per-sample results, in provider order.
    pub samples: Vec<TargetSample>,
    /// Accepted paths summed over all samples, divided by the sample count.
    pub mean_paths_per_target: f64,
    /// Mean accessibility score over all samples.
    pub mean_score: f64,
}

impl TargetAnalysis {
    /// Accepted paths summed over all samples.
    pub fn total_paths(&self) -> usize {
        self.samples.iter().map(|s| s.paths.len()).sum()
    }

    /// Sample with the highest score. First sample wins ties.
    pub fn best_sample(&self) -> Option<&TargetSample> {
        let mut best: Option<&TargetSample> = None;
        for sample in &self.samples {
            if best.map_or(true, |b| sample.accessibility.score > b.accessibility.score) {
                best = Some(sample);
            }
        }
        best
    }
}

/// Run [`compute_paths`] and [`calc_approach_score`] for every sample point
/// of `provider`.
pub fn analyze_targets<P: TargetProvider + ?Sized>(
    provider: &P,
    index: &SpatialIndex,
    skin: &Mesh,
    params: &AnalysisParams,
) -> Result<TargetAnalysis> {
    provider.validate()?;
    let points = provider.sample_points();
    if points.is_empty() {
        return Err(AnalysisError::NoTargets);
    }

    let description = provider.describe();
    info!(provider = %description, samples = points.len(), "analyzing target");

    let samples = points
        .into_iter()
        .map(|point| {
            Ok(TargetSample {
                point,
                paths: compute_paths(&point, index, skin, params)?,
                accessibility: calc_approach_score(&point, index, skin, params)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let count = samples.len() as f64;
    let total_paths: usize = samples.iter().map(|s| s.paths.len()).sum();
    let total_score: f64 = samples.iter().map(|s| s.accessibility.score).sum();

    Ok(TargetAnalysis {
        description,
        mean_paths_per_target: total_paths as f64 / count,
        mean_score: total_score / count,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn skin_patch() -> Mesh {
        Mesh::from_triangles(
            vec![
                Point3::new(-5.0, -5.0, 20.0),
                Point3::new(5.0, -5.0, 20.0),
                Point3::new(5.0, 5.0, 20.0),
                Point3::new(-5.0, 5.0, 20.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_point_target() {
        let target = PointTarget(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(target.sample_points(), vec![Point3::new(1.0, 2.0, 3.0)]);
        assert!(target.describe().starts_with("point"));
        assert!(PointTarget(Point3::new(f64::NAN, 0.0, 0.0)).validate().is_err());
    }

    #[test]
    fn test_surface_target_keeps_vertex_order() {
        let mesh = skin_patch();
        let samples = SurfaceTarget(mesh.clone()).sample_points();
        assert_eq!(samples, mesh.vertices);
    }

    #[test]
    fn test_voxel_target_centers() {
        // 2 x 2 x 2 volume, labels 1 at (1, 0, 0) and (0, 1, 1).
        let mut labels = vec![0; 8];
        labels[1] = 1;
        labels[6] = 1;
        let target =
            VoxelTarget::new(Point3::new(10.0, 20.0, 30.0), [0.5, 1.0, 2.0], [2, 2, 2], labels, 1)
                .unwrap();
        assert_eq!(target.num_labelled(), 2);
        let points = target.sample_points();
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].x, 10.5);
        assert_relative_eq!(points[0].y, 20.0);
        assert_relative_eq!(points[1].x, 10.0);
        assert_relative_eq!(points[1].y, 21.0);
        assert_relative_eq!(points[1].z, 32.0);
    }

    #[test]
    fn test_voxel_target_rejects_bad_volume() {
        assert!(matches!(
            VoxelTarget::new(Point3::origin(), [1.0; 3], [2, 2, 2], vec![0; 7], 1),
            Err(AnalysisError::InvalidTarget(_))
        ));
        assert!(VoxelTarget::new(Point3::origin(), [1.0, 0.0, 1.0], [1, 1, 1], vec![1], 1).is_err());
    }

    #[test]
    fn test_empty_provider() {
        let target = VoxelTarget::new(Point3::origin(), [1.0; 3], [1, 1, 1], vec![0], 1).unwrap();
        let index = SpatialIndex::build(&Mesh::new()).unwrap();
        let result = analyze_targets(&target, &index, &skin_patch(), &AnalysisParams::default());
        assert_eq!(result, Err(AnalysisError::NoTargets));
    }

    #[test]
    fn test_analyze_targets_means() {
        let target = SurfaceTarget(Mesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        ));
        let index = SpatialIndex::build(&Mesh::new()).unwrap();
        let analysis =
            analyze_targets(&target, &index, &skin_patch(), &AnalysisParams::default()).unwrap();
        assert_eq!(analysis.samples.len(), 3);
        assert_eq!(analysis.total_paths(), 12);
        assert_relative_eq!(analysis.mean_paths_per_target, 4.0);
        let mean = analysis
            .samples
            .iter()
            .map(|s| s.accessibility.score)
            .sum::<f64>()
            / 3.0;
        assert_relative_eq!(analysis.mean_score, mean);
        assert!(analysis.best_sample().is_some());
    }
}
