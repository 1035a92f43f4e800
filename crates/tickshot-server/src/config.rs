//! Server configuration.
//!
//! Provides the match loop, bot and logging parameters plus the simulation
//! settings. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tickshot_sim::SimSettings;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "tickshot.toml";

/// Most bots per side.
const MAX_BOTS_PER_SIDE: u32 = 16;

/// Errors reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to access the file
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Server configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // === Loop Settings ===
    /// Ticks per second
    pub tick_rate: u32,
    /// Ticks to simulate before shutting down
    pub ticks_to_run: u64,
    /// Sleep between ticks to keep wall-clock pace
    pub realtime: bool,
    /// RNG seed (None = random, logged at startup)
    pub seed: Option<u64>,

    // === Match Settings ===
    /// Shuffle spawn candidates every round
    pub randomize_spawns: bool,
    /// Scripted attacker bots
    pub attacker_bots: u32,
    /// Scripted defender bots
    pub defender_bots: u32,
    /// Bots open fire within this distance
    pub engage_distance: i32,
    /// RON map file (None = built-in practice arena)
    pub map_path: Option<PathBuf>,

    // === Debug Settings ===
    /// Comma-separated tracing directives
    pub log_filter: String,
    /// Write a JSON geometry snapshot here after loading the map
    pub snapshot_path: Option<PathBuf>,

    // === Simulation ===
    /// Simulation tuning
    pub sim: SimSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: 64,
            ticks_to_run: 640,
            realtime: false,
            seed: None,

            randomize_spawns: true,
            attacker_bots: 2,
            defender_bots: 2,
            engage_distance: 1800,
            map_path: None,

            log_filter: "tickshot_server=info,tickshot_sim=info".to_string(),
            snapshot_path: None,

            sim: SimSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Reads and validates a configuration file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate();
        Ok(config)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("Config file {} not found, using defaults", path.display());
                Self::default()
            },
            Err(e) => {
                warn!("{e} ({}), using defaults", path.display());
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to valid ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 256);

        self.attacker_bots = self.attacker_bots.min(MAX_BOTS_PER_SIDE);
        self.defender_bots = self.defender_bots.min(MAX_BOTS_PER_SIDE);
        self.engage_distance = self.engage_distance.max(0);

        if self.log_filter.trim().is_empty() {
            self.log_filter = Self::default().log_filter;
        }

        self.sim.validate();
    }

    /// Tracing directives, one per entry.
    pub fn log_directives(&self) -> impl Iterator<Item = &str> {
        self.log_filter
            .split(',')
            .map(str::trim)
            .filter(|directive| !directive.is_empty())
    }
}
