use std::{fs, path::Path};

use anyhow::{Context, Result};
use mine_wrap_core::{Action, Direction};
use mine_wrap_system_simulation::RunLimits;
use serde::Deserialize;
use thiserror::Error;

/// Run settings loaded from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    /// Maximum number of turns to play.
    pub max_turns: u64,
    /// Action code of the direction tried first before any move was made.
    pub initial_direction: char,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Stop as soon as coverage completes or nothing reachable remains.
    pub stop_early: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let limits = RunLimits::default();
        Self {
            max_turns: limits.max_turns,
            initial_direction: Action::Move(Direction::Up).code(),
            log_filter: "info".to_owned(),
            stop_early: limits.stop_early,
        }
    }
}

/// Errors raised while interpreting run settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The TOML text could not be deserialised.
    #[error("invalid run configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The initial direction was not one of `W`, `S`, `A`, `D`.
    #[error("initial direction `{code}` is not a move (expected W, S, A or D)")]
    InvalidDirection {
        /// Code as configured.
        code: char,
    },
}

impl RunConfig {
    /// Reads the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text. Missing keys keep their defaults.
    pub(crate) fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        let _ = config.direction()?;
        Ok(config)
    }

    /// Direction named by `initial_direction`.
    pub(crate) fn direction(&self) -> Result<Direction, ConfigError> {
        Action::from_code(self.initial_direction.to_ascii_uppercase())
            .and_then(Action::direction)
            .ok_or(ConfigError::InvalidDirection {
                code: self.initial_direction,
            })
    }

    /// Turn limits for the simulation driver.
    pub(crate) fn limits(&self) -> RunLimits {
        RunLimits {
            max_turns: self.max_turns,
            stop_early: self.stop_early,
        }
    }
}
