//! screw3d - Leonardo da Vinci's aerial screw in the terminal
//!
//! Builds the model, then orbits the camera around it while the screw
//! spins about its mast.
//! Controls:
//!   - Q/ESC/Ctrl-C: Quit

use anyhow::{Context, Result};
use screw3d_core::{build_scene, SceneConfig};
use screw3d_terminal::TerminalApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout carries the frames, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let scene = build_scene(&SceneConfig::default()).context("failed to build the scene")?;

    info!("starting terminal renderer (press Q to quit)");
    let mut app = TerminalApp::new(scene).context("failed to read the terminal size")?;
    app.run().context("terminal renderer failed")?;

    info!("renderer closed");
    Ok(())
}
