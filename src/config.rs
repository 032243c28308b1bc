//! TOML configuration for rostering runs.
//!
//! ```toml
//! [parameters]
//! overtime_weight = 10.0
//! understaff_weight = 50.0
//! preference_weight = 1.0
//! allow_overtime = true
//! allow_understaffing = false
//! skill_compatibility = "hierarchical"
//!
//! [solver]
//! time_limit_ms = 30000
//! ```
//!
//! Every key is optional; omitted keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lp::SolverConfig;
use crate::models::Parameters;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed into a configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    /// Objective weights and feature switches.
    pub parameters: Parameters,
    /// Solver limits.
    pub solver: SolverConfig,
}

impl RosterConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
