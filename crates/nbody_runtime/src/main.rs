//! N-body Runtime
//!
//! Headless entry point: loads settings, builds the one simulation instance,
//! runs the tick loop and tears everything down once.

mod runner;

use anyhow::{Context, Result};
use nbody_render::{HeadlessSink, Palette};
use nbody_services::{Settings, SETTINGS_ENV};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::runner::Runner;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    tracing::info!(
        metrics = nbody_metrics::ENABLED,
        "N-body simulator v{}",
        nbody_core::VERSION
    );

    let settings_path = std::env::var_os(SETTINGS_ENV);
    let settings = Settings::load_or_default(settings_path.as_ref())
        .context("failed to load settings")?;

    let palette = Palette::new(&settings.palette).context("invalid palette in settings")?;
    let mut runner = Runner::new(&settings, HeadlessSink::new(palette))?;
    for group in runner.simulation().groups() {
        tracing::info!(
            handle = %group.handle(),
            start = group.start(),
            count = group.count(),
            "live group"
        );
    }
    runner.run();

    if let Some((min, max)) = runner.sink().bounds() {
        tracing::info!(
            vertices = runner.sink().vertices().len(),
            bytes = runner.sink().vertex_bytes().len(),
            min = ?min,
            max = ?max,
            "last frame"
        );
    }

    let summary = runner.finish();
    tracing::info!(
        ticks = summary.ticks,
        particles = summary.particles,
        groups = summary.groups,
        frames = summary.frames_presented,
        center_of_mass = ?summary.center_of_mass,
        "run complete"
    );
    Ok(())
}
