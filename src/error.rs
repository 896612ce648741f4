//! Custom error types for the plumbing around the engine
//!
//! The analyzer itself never fails; these cover configuration, watchlist
//! folders and upstream payload decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Watchlist folder errors
#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("Failed to read watchlist {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Upstream batch decoding errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed batch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognised batch shape: {0}")]
    Shape(String),
}
