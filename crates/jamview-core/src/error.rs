//! Error types for loading simulation logs and playback configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure to load a simulation log. The engine must not start.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read simulation log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed simulation log: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid time step dt={dt} for a log with {steps} steps")]
    InvalidTimeStep { dt: f64, steps: usize },
}

/// Unreadable or invalid playback configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
