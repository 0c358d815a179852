//! The two streaming queries of the word-count job.
//!
//! Both read the same stream of [`LineRecord`]s:
//! - [`WordCountQuery`] (`word_counts`): cleaned, filtered words counted
//!   per word in sliding windows.
//! - [`MessageCountQuery`] (`message_counts`): lines counted per window,
//!   without a key.
//!
//! Windows are 10 s wide, slide every 5 s, and tolerate 30 s of lateness.

use std::fmt;
use std::time::Duration;

use crate::console::format_timestamp;
use crate::counter::WindowedCounter;
use crate::record::{EventTime, LineRecord, WindowedCount};
use crate::text::extract_words;
use crate::window::{SlidingWindows, DEFAULT_WINDOWS};

/// Allowed lateness before a window is finalized and dropped.
pub const WATERMARK_DELAY: Duration = Duration::from_secs(30);

/// One output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(u64),
    Timestamp(EventTime),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{}", n),
            Cell::Timestamp(ts) => f.write_str(&format_timestamp(*ts)),
        }
    }
}

/// One output row, aligned with [`StreamingQuery::columns`].
pub type Row = Vec<Cell>;

/// A long-lived query fed one micro-batch at a time.
pub trait StreamingQuery: Send {
    /// Query name, used to label sink output.
    fn name(&self) -> &str;

    /// Column headers for the rows this query produces.
    fn columns(&self) -> &'static [&'static str];

    /// Process a micro-batch and return the rows updated by it.
    fn process_batch(&mut self, batch: &[LineRecord]) -> Vec<Row>;
}

/// Per-word counts over sliding windows.
#[derive(Debug)]
pub struct WordCountQuery {
    counter: WindowedCounter<String>,
}

impl WordCountQuery {
    pub fn new() -> Self {
        Self::with_windowing(DEFAULT_WINDOWS, WATERMARK_DELAY)
    }

    pub fn with_windowing(windows: SlidingWindows, watermark_delay: Duration) -> Self {
        WordCountQuery {
            counter: WindowedCounter::new(windows, watermark_delay),
        }
    }
}

impl Default for WordCountQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingQuery for WordCountQuery {
    fn name(&self) -> &str {
        "word_counts"
    }

    fn columns(&self) -> &'static [&'static str] {
        &["word", "count", "window_start", "window_end"]
    }

    fn process_batch(&mut self, batch: &[LineRecord]) -> Vec<Row> {
        let rows = batch
            .iter()
            .flat_map(extract_words)
            .map(|w| (w.timestamp(), w.word));

        self.counter
            .process_batch(rows)
            .into_iter()
            .map(|WindowedCount { key, count, window }| {
                vec![
                    Cell::Text(key),
                    Cell::Count(count),
                    Cell::Timestamp(window.start),
                    Cell::Timestamp(window.end),
                ]
            })
            .collect()
    }
}

/// Line counts over sliding windows.
#[derive(Debug)]
pub struct MessageCountQuery {
    counter: WindowedCounter<()>,
}

impl MessageCountQuery {
    pub fn new() -> Self {
        Self::with_windowing(DEFAULT_WINDOWS, WATERMARK_DELAY)
    }

    pub fn with_windowing(windows: SlidingWindows, watermark_delay: Duration) -> Self {
        MessageCountQuery {
            counter: WindowedCounter::new(windows, watermark_delay),
        }
    }
}

impl Default for MessageCountQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingQuery for MessageCountQuery {
    fn name(&self) -> &str {
        "message_counts"
    }

    fn columns(&self) -> &'static [&'static str] {
        &["count", "window_start", "window_end"]
    }

    fn process_batch(&mut self, batch: &[LineRecord]) -> Vec<Row> {
        let rows = batch.iter().map(|line| (line.timestamp, ()));

        self.counter
            .process_batch(rows)
            .into_iter()
            .map(|c| {
                vec![
                    Cell::Count(c.count),
                    Cell::Timestamp(c.window.start),
                    Cell::Timestamp(c.window.end),
                ]
            })
            .collect()
    }
}
