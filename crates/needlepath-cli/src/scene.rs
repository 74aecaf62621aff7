//! Scene and parameter file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use needlepath::{AnalysisParams, PointTarget, SurfaceTarget, TargetProvider, VoxelTarget};
use needlepath_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the target is given in a scene file.
///
/// - `[x, y, z]` for a single point
/// - `{"mesh": {...}}` for every vertex of a surface
/// - `{"voxels": {...}}` for a labelled region of a volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneTarget {
    Point(PointTarget),
    Surface { mesh: SurfaceTarget },
    Voxels { voxels: VoxelTarget },
}

impl SceneTarget {
    pub fn provider(&self) -> &dyn TargetProvider {
        match self {
            SceneTarget::Point(point) => point,
            SceneTarget::Surface { mesh } => mesh,
            SceneTarget::Voxels { voxels } => voxels,
        }
    }
}

/// Inputs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub target: SceneTarget,
    /// Surfaces the needle must avoid. May be omitted for an unobstructed run.
    #[serde(default)]
    pub obstacle: Mesh,
    /// Candidate entry surface.
    pub skin: Mesh,
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let scene =
        parse_scene(&json).with_context(|| format!("failed to parse scene {}", path.display()))?;
    debug!(
        obstacle_cells = scene.obstacle.num_cells(),
        skin_vertices = scene.skin.num_vertices(),
        skin_cells = scene.skin.num_cells(),
        "loaded scene"
    );
    Ok(scene)
}

pub fn parse_scene(json: &str) -> Result<Scene> {
    let scene: Scene = serde_json::from_str(json)?;
    scene.obstacle.validate().context("invalid obstacle mesh")?;
    scene.skin.validate().context("invalid skin mesh")?;
    Ok(scene)
}

/// Load parameters from a TOML file, or defaults when no file is given.
pub fn load_params(path: Option<&Path>) -> Result<AnalysisParams> {
    let params = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read parameters {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse parameters {}", path.display()))?
        }
        None => AnalysisParams::default(),
    };
    params.validate()?;
    Ok(params)
}
