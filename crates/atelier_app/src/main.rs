//! Atelier
//!
//! 3D product configurator: load a glTF model, orbit around it with
//! the mouse, and recolor its configurable parts from the keyboard.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod settings;
mod shell;

use settings::Settings;
use shell::AppConfig;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reactive 3D product configurator", long_about = None)]
struct Cli {
    /// Path to the glTF model to configure
    #[arg(default_value = "assets/sofa.gltf")]
    model: PathBuf,

    /// Window width in logical pixels
    #[arg(long, default_value = "1200")]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// Optional settings file (palette, initial colors, tuning)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    shell::run(AppConfig {
        model_path: cli.model,
        window_width: cli.width,
        window_height: cli.height,
        settings,
    })
}
