//! Error types for the word-count job.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("could not connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("error reading from source: {0}")]
    Read(#[source] io::Error),

    #[error("error writing query output: {0}")]
    Sink(#[source] io::Error),

    #[error("error encoding query output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("query task {name} stopped unexpectedly: {reason}")]
    Task { name: &'static str, reason: String },
}
