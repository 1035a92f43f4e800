//! # Tickshot Server
//!
//! Headless match server for Tickshot.
//!
//! Loads the TOML configuration and a RON map, then runs scripted bots
//! through the authoritative tick simulation, logging kills and sounds.
//!
//! Usage:
//! - `tickshot-server [config.toml]` runs a match
//! - `tickshot-server --export-arena <map.ron>` writes the built-in arena as a map file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod map_loader;
mod runner;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServerConfig;

/// Main entry point.
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let export_path = match args.first().map(String::as_str) {
        Some("--export-arena") => Some(
            args.get(1)
                .ok_or_else(|| anyhow::anyhow!("--export-arena needs an output path"))?,
        ),
        _ => None,
    };

    let config = match (export_path, args.first()) {
        (None, Some(path)) => ServerConfig::load_from(path),
        _ => ServerConfig::load(),
    };

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in config.log_directives() {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Tickshot server starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = export_path {
        map_loader::save_map(&tickshot_sim::MapDef::practice_arena(), path)?;
        return Ok(());
    }

    runner::run(&config)?;

    info!("Tickshot server shutdown complete");
    Ok(())
}
