//! needlepath CLI - Needle trajectory analysis
//!
//! Loads a JSON scene (target, obstacle and skin meshes), runs the
//! visibility sweep and the accessibility scorer, and reports the results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use needlepath::{analyze_targets, compute_paths, virtual_path, AnalysisParams, SpatialIndex};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod report;
mod scene;

use report::{PathSummary, Report};
use scene::{load_params, load_scene, SceneTarget};

#[derive(Parser)]
#[command(name = "needlepath")]
#[command(about = "Needle trajectory visibility and accessibility analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find visible paths and score accessibility for a scene
    Analyze {
        /// Scene file (.json)
        scene: PathBuf,
        /// Parameter file (.toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include every accepted path in the report
        #[arg(long)]
        paths: bool,
    },
    /// Summarize the visible paths for a scene
    Paths {
        /// Scene file (.json)
        scene: PathBuf,
        /// Parameter file (.toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Print a path whose entry slides toward the target
    Virtual {
        /// Scene file (.json) with a point target
        scene: PathBuf,
        /// Index of the path to slide
        #[arg(long)]
        index: usize,
        /// Interpolation parameter in [0, 1]
        #[arg(long)]
        t: f64,
        /// Parameter file (.toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Print the default parameters as TOML
    Params,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            scene,
            params,
            output,
            paths,
        } => run_analyze(&scene, params, output, paths)?,
        Commands::Paths { scene, params } => run_paths(&scene, params)?,
        Commands::Virtual {
            scene,
            index,
            t,
            params,
        } => run_virtual(&scene, index, t, params)?,
        Commands::Params => {
            print!("{}", toml::to_string_pretty(&AnalysisParams::default())?);
        }
    }

    Ok(())
}

fn run_analyze(
    scene_path: &PathBuf,
    params_path: Option<PathBuf>,
    output: Option<PathBuf>,
    include_paths: bool,
) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let params = load_params(params_path.as_deref())?;
    let index = SpatialIndex::build(&scene.obstacle).context("failed to index obstacle mesh")?;

    let analysis = analyze_targets(scene.target.provider(), &index, &scene.skin, &params)?;
    let report = Report::new(analysis, params, index.num_triangles(), include_paths);
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Target: {}", report.target);
            println!("Mean paths per target: {:.2}", report.mean_paths_per_target);
            println!("Mean score: {:.3}", report.mean_score);
            println!("Wrote report to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn run_paths(scene_path: &PathBuf, params_path: Option<PathBuf>) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let params = load_params(params_path.as_deref())?;
    let index = SpatialIndex::build(&scene.obstacle).context("failed to index obstacle mesh")?;

    let provider = scene.target.provider();
    println!("Target: {}", provider.describe());
    for point in provider.sample_points() {
        let paths = compute_paths(&point, &index, &scene.skin, &params)?;
        let summary = PathSummary::from(&paths);
        println!(
            "({:.3}, {:.3}, {:.3}): {} of {} vertices",
            point.x, point.y, point.z, summary.count, summary.candidates
        );
        match (summary.shortest_length, summary.longest_length) {
            (Some(shortest), Some(longest)) => {
                println!("  Shortest: #{} ({:.3})", summary.shortest_index, shortest);
                println!("  Longest:  #{} ({:.3})", summary.longest_index, longest);
            }
            _ => println!("  No unobstructed path"),
        }
        if summary.skipped_coincident > 0 {
            println!("  Skipped {} vertices on the target", summary.skipped_coincident);
        }
    }

    Ok(())
}

fn run_virtual(
    scene_path: &PathBuf,
    index: usize,
    t: f64,
    params_path: Option<PathBuf>,
) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let SceneTarget::Point(target) = scene.target else {
        bail!("virtual paths need a point target");
    };
    let params = load_params(params_path.as_deref())?;
    let spatial = SpatialIndex::build(&scene.obstacle).context("failed to index obstacle mesh")?;

    let paths = compute_paths(&target.0, &spatial, &scene.skin, &params)?;
    let path = virtual_path(&paths, index, t)?;

    println!("{}", serde_json::to_string_pretty(&path)?);
    println!("Length: {:.3}", path.length());

    Ok(())
}
