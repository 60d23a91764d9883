//! Error types for configuration and level-table loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors while building a level curve
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("level table needs at least two entries, got {len}")]
    TooShort { len: usize },

    #[error("level table must start at 0 XP, starts at {first}")]
    NonZeroStart { first: u64 },

    #[error("level table decreases at level {level}")]
    Decreasing { level: u32 },

    #[error("failed to read level table {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level table TOML")]
    ParseToml(#[from] toml::de::Error),
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to read configuration file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
