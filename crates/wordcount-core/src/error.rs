//! Error types for the pipeline core.
//!
//! Record processing is infallible; only building a window
//! definition can fail.

use thiserror::Error;

/// Invalid sliding-window parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Window size or slide was zero.
    #[error("window size and slide must be non-zero")]
    ZeroDuration,

    /// The slide was longer than the window (rows would fall in gaps).
    #[error("slide ({slide_ms} ms) must not exceed window size ({size_ms} ms)")]
    SlideExceedsSize { size_ms: i64, slide_ms: i64 },
}
