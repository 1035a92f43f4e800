//! Map file loading.
//!
//! Maps are RON documents deserialized straight into [`MapDef`].

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tickshot_common::Side;
use tickshot_sim::MapDef;
use tracing::{info, warn};

/// Errors that can occur when loading a map.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// Map file not found
    #[error("Map file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read or write a file
    #[error("Failed to access map file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse RON
    #[error("Failed to parse map: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Failed to write RON
    #[error("Failed to serialize map: {0}")]
    Serialize(#[from] ron::Error),

    /// Map is unusable
    #[error("Invalid map '{name}': {reason}")]
    Invalid {
        /// Map name
        name: String,
        /// What is wrong
        reason: String,
    },
}

/// Result type for map loading.
pub type MapLoadResult<T> = Result<T, MapLoadError>;

/// Loads and checks a map file.
pub fn load_map<P: AsRef<Path>>(path: P) -> MapLoadResult<MapDef> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapLoadError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let map: MapDef = ron::from_str(&contents)?;
    check_map(&map)?;

    info!(
        "Loaded map '{}' from {} ({} walls, {} floors, {} boxes, {} ramps)",
        map.name,
        path.display(),
        map.walls.len(),
        map.floors.len(),
        map.boxes.len(),
        map.ramps.len()
    );
    Ok(map)
}

/// Writes a map as pretty RON, creating parent directories.
pub fn save_map<P: AsRef<Path>>(map: &MapDef, path: P) -> MapLoadResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(map, config)?;
    fs::write(path, contents)?;

    info!("Saved map '{}' to {}", map.name, path.display());
    Ok(())
}

/// Rejects maps nobody could play on.
///
/// A map without any floor leaves every player falling forever, and a map
/// without any spawn has nowhere to put them. One empty side is allowed
/// for practice maps.
pub fn check_map(map: &MapDef) -> MapLoadResult<()> {
    let invalid = |reason: &str| MapLoadError::Invalid {
        name: map.name.clone(),
        reason: reason.to_string(),
    };

    if map.floors.is_empty() && map.boxes.is_empty() && map.ramps.is_empty() {
        return Err(invalid("no floors"));
    }
    if map.spawn_attacker.is_empty() && map.spawn_defender.is_empty() {
        return Err(invalid("no spawn positions"));
    }

    for side in [Side::Attacker, Side::Defender] {
        if let Some(spawn) = map.spawns(side).iter().find(|p| p.x < 0 || p.y < 0 || p.z < 0) {
            return Err(invalid(&format!("{side} spawn {spawn} lies outside the world")));
        }
    }
    if map.walls.iter().any(|wall| wall.width <= 0 || wall.height <= 0) {
        warn!("Map '{}' contains zero-sized walls", map.name);
    }
    Ok(())
}
