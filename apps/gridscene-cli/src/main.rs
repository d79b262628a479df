use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use gridscene_assets::load_model_from_file;
use gridscene_layout::{DEFAULT_LAYOUT_COUNT, MAX_LAYOUT_INSTANCES, gen_volume, volume_len};
use gridscene_render::{ApplicationLoop, FAR_PLANE, FOV_Y_DEGREES, NEAR_PLANE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridscene-cli", about = "CLI tool for gridscene inspection")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate the volume layout and summarize it
    Layout {
        /// Layout count passed to the volume generator
        #[arg(short, long, default_value_t = DEFAULT_LAYOUT_COUNT)]
        count: usize,
        /// Print the summary and positions as JSON
        #[arg(long)]
        json: bool,
        /// Maximum number of positions to list
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },
    /// Load an OBJ file and report its mesh statistics
    Model {
        /// Path to the OBJ file
        path: PathBuf,
    },
    /// Print the initial camera matrices
    Camera {
        /// Viewport aspect ratio (width / height)
        #[arg(short, long, default_value = "1.3333334")]
        aspect: f32,
    },
}

/// Axis-aligned extent of a point set.
fn bounds(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

/// Reject counts whose layout would overflow or exceed [`MAX_LAYOUT_INSTANCES`].
fn checked_instance_count(count: usize) -> anyhow::Result<usize> {
    match volume_len(count) {
        Some(n) if n <= MAX_LAYOUT_INSTANCES => Ok(n),
        Some(n) => anyhow::bail!(
            "count {count} yields {n} instances, limit is {MAX_LAYOUT_INSTANCES}"
        ),
        None => anyhow::bail!("count {count} overflows the layout size"),
    }
}

fn print_matrix(label: &str, m: Mat4) {
    println!("{label}:");
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]", r.x, r.y, r.z, r.w);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("gridscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", gridscene_common::crate_info());
            println!("layout: {}", gridscene_layout::crate_info());
            println!("assets: {}", gridscene_assets::crate_info());
            println!("scene: {}", gridscene_scene::crate_info());
            println!("input: {}", gridscene_input::crate_info());
            println!("render: {}", gridscene_render::crate_info());
            println!(
                "default layout: count={DEFAULT_LAYOUT_COUNT}, instances={}",
                checked_instance_count(DEFAULT_LAYOUT_COUNT)?
            );
        }
        Commands::Layout { count, json, limit } => {
            checked_instance_count(count)?;
            let positions = gen_volume(count);
            tracing::debug!("generated {} positions for count {count}", positions.len());
            let extent = bounds(positions.iter().copied());

            if json {
                let doc = serde_json::json!({
                    "count": count,
                    "instances": positions.len(),
                    "min": extent.map(|(min, _)| min),
                    "max": extent.map(|(_, max)| max),
                    "positions": positions.iter().take(limit).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
                return Ok(());
            }

            println!("Layout: count={count}, instances={}", positions.len());
            match extent {
                Some((min, max)) => println!("Bounds: min={min} max={max}"),
                None => println!("Bounds: empty"),
            }
            for (i, p) in positions.iter().take(limit).enumerate() {
                println!("  #{i:<6} ({:>7.2}, {:>7.2}, {:>7.2})", p.x, p.y, p.z);
            }
            if positions.len() > limit {
                println!("  ... {} more", positions.len() - limit);
            }
        }
        Commands::Model { path } => {
            let mesh = load_model_from_file(&path)
                .with_context(|| format!("loading model {}", path.display()))?;
            println!("Model: {}", mesh.name);
            println!(
                "Vertices: {}, indices: {}, triangles: {}",
                mesh.vertex_count(),
                mesh.index_count(),
                mesh.index_count() / 3
            );
            match bounds(mesh.vertices.iter().map(|v| Vec3::from(v.position))) {
                Some((min, max)) => println!("Bounds: min={min} max={max}"),
                None => println!("Bounds: empty"),
            }
        }
        Commands::Camera { aspect } => {
            anyhow::ensure!(
                aspect.is_finite() && aspect > 0.0,
                "aspect ratio must be positive, got {aspect}"
            );
            let app = ApplicationLoop::default();
            let mut camera = *app.camera();
            camera.set_perspective(FOV_Y_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
            println!(
                "Camera: fov_y={FOV_Y_DEGREES}deg aspect={aspect} near={NEAR_PLANE} far={FAR_PLANE}"
            );
            print_matrix("View", camera.view());
            print_matrix("Projection", camera.projection());
            print_matrix("View-projection", camera.view_projection());
        }
    }

    Ok(())
}
