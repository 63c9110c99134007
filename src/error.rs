use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while discovering or reading source files.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration detected before any sink call is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {option} pattern {pattern:?}: {source}")]
    Pattern {
        option: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A single node or edge write rejected by the graph sink.
///
/// Recovered by the pipeline: logged, counted, and the run continues.
#[derive(Error, Debug)]
pub enum StoreWriteError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sink is closed")]
    Closed,

    #[error("sink rejected write: {0}")]
    Rejected(String),
}
