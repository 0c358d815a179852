//! Record types flowing through the word-count pipeline.
//!
//! - [`LineRecord`]: one line read from the source, stamped at ingestion.
//! - [`WordRecord`]: one token of a line, borrowing the line it came from.
//! - [`WindowedCount`]: an aggregate emitted by a windowed counter.

use crate::window::TimeWindow;

/// Event time in milliseconds since the Unix epoch.
pub type EventTime = i64;

/// A raw input line enriched with ingestion metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// The line exactly as it was received (without the terminator).
    pub original_text: String,

    /// Ingestion time, used as the event time for windowing.
    pub timestamp: EventTime,

    /// Length of `original_text` in characters.
    pub text_length: usize,
}

impl LineRecord {
    pub fn new(original_text: impl Into<String>, timestamp: EventTime) -> Self {
        let original_text = original_text.into();
        let text_length = original_text.chars().count();
        LineRecord {
            original_text,
            timestamp,
            text_length,
        }
    }
}

/// A single cleaned token, tied to the line it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord<'a> {
    pub word: String,
    pub line: &'a LineRecord,
}

impl WordRecord<'_> {
    /// Event time inherited from the originating line.
    pub fn timestamp(&self) -> EventTime {
        self.line.timestamp
    }
}

/// Count of rows for one grouping key inside one window.
///
/// `K` is the grouping key: `String` for per-word counts, `()` for
/// unkeyed counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedCount<K> {
    pub key: K,
    pub count: u64,
    pub window: TimeWindow,
}
