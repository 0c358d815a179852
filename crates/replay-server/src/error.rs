//! Error types for the replay server.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value} (expected a finite, non-negative number of seconds)")]
    InvalidDelay { name: &'static str, value: f64 },

    #[error("delay-min ({min:?}) must not exceed delay-max ({max:?})")]
    DelayRangeInverted {
        min: std::time::Duration,
        max: std::time::Duration,
    },

    #[error("max-sessions must be at least 1")]
    ZeroMaxSessions,

    #[error("max-sessions ({value}) exceeds the limit of {max}")]
    MaxSessionsTooLarge { value: usize, max: usize },
}

/// Failure to read one corpus file. Never fatal: the file is skipped.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("file {} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("error reading {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Errors that stop the server before or while accepting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not resolve {addr}: {source}")]
    Resolve { addr: String, source: io::Error },

    #[error("could not bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}
