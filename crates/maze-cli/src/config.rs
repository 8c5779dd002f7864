//! Configuration management for the maze CLI

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use maze_rl::{Algorithm, SolverConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub solver: SolverConfig,
    pub run: RunConfig,
}

/// How a single training run is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    /// Maze text file to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maze_path: Option<PathBuf>,
    /// Stop after this many ticks even if the solver has not finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<usize>,
    /// Delay between ticks; 0 runs them back to back
    pub tick_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            maze_path: None,
            ticks: None,
            tick_interval_ms: 0,
        }
    }
}

impl MazeConfig {
    /// Load configuration from defaults, a config file and the environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::find_config_file(),
        };

        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = &config_path {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.clone()).required(false));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        // MAZE_SOLVER__ALPHA=0.2 sets solver.alpha
        builder = builder.add_source(
            Environment::with_prefix("MAZE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .solver
            .validate()
            .context("Invalid solver configuration")?;

        Ok(config)
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        // Check in order: MAZE_CONFIG env, ./maze.toml, ~/.config/maze/maze.toml
        if let Ok(path) = std::env::var("MAZE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("maze.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("maze").join("maze.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
