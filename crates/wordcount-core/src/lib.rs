//! wordcount-core
//!
//! Pure word-count pipeline logic:
//! - records (lines, words, windowed counts)
//! - text cleaning, tokenization and stop-word filtering
//! - sliding event-time windows and a bounded-lateness watermark
//! - update-mode windowed counting
//! - the two streaming queries and their console rendering

pub mod record;
pub mod stop_words;
pub mod text;
pub mod window;
pub mod watermark;
pub mod counter;
pub mod query;
pub mod console;
pub mod error;

pub use record::{EventTime, LineRecord, WindowedCount, WordRecord};
pub use window::{SlidingWindows, TimeWindow};
pub use watermark::Watermark;
pub use counter::WindowedCounter;
pub use query::{Cell, MessageCountQuery, Row, StreamingQuery, WordCountQuery};
pub use error::WindowError;
