mod platform;

use anyhow::{Context, Result};
use clap::Parser;
use gridscene_assets::MeshTable;
use gridscene_input::KeyboardMovementController;
use gridscene_layout::{DEFAULT_LAYOUT_COUNT, MAX_LAYOUT_INSTANCES, volume_len};
use gridscene_render::ApplicationLoop;
use gridscene_render_wgpu::{SimpleRenderSystem, WgpuRenderer};
use gridscene_scene::SceneCollection;
use platform::{DesktopWindow, KeyBindings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gridscene-desktop",
    about = "Render a procedural grid of mesh instances"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// OBJ file instanced across the grid
    #[arg(long, default_value = "models/flat_vase.obj")]
    model: PathBuf,

    /// Layout count passed to the volume generator
    #[arg(long, default_value_t = DEFAULT_LAYOUT_COUNT)]
    count: usize,

    /// Initial window width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Viewer translation speed in units per second
    #[arg(long, default_value = "3.0")]
    move_speed: f32,

    /// Viewer turn speed in radians per second
    #[arg(long, default_value = "1.5")]
    look_speed: f32,
}

impl Cli {
    fn controller(&self) -> KeyboardMovementController {
        KeyboardMovementController::new(self.move_speed, self.look_speed)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("gridscene-desktop v{} starting", env!("CARGO_PKG_VERSION"));

    match volume_len(cli.count) {
        Some(n) if n <= MAX_LAYOUT_INSTANCES => {}
        _ => anyhow::bail!(
            "--count {} exceeds the limit of {MAX_LAYOUT_INSTANCES} instances",
            cli.count
        ),
    }

    let mut meshes = MeshTable::new();
    let mesh = meshes
        .load(&cli.model)
        .with_context(|| format!("loading model {}", cli.model.display()))?;
    let scene = SceneCollection::from_layout(mesh, cli.count);
    tracing::info!(
        "scene ready: {} objects from layout count {}",
        scene.len(),
        cli.count
    );

    let mut window = DesktopWindow::open("gridscene", cli.width, cli.height, KeyBindings::default())?;
    let native = window
        .window()
        .context("window handle missing after startup")?;
    let mut renderer = WgpuRenderer::new(native)?;
    let mut system = SimpleRenderSystem::new(
        renderer.device(),
        renderer.queue(),
        renderer.surface_format(),
        &meshes,
    );

    let mut app = ApplicationLoop::new(cli.controller());
    let stats = app.run(&mut window, &mut renderer, &mut system, &scene)?;

    tracing::info!(
        "shutdown: {} frames presented, {} skipped",
        stats.frames_presented,
        stats.frames_skipped
    );
    Ok(())
}
