//! Bounded-lateness watermark.

use std::time::Duration;

use crate::record::EventTime;

/// Tracks the highest event time seen and derives a watermark that
/// trails it by a fixed delay.
///
/// Rows older than the watermark are considered late.
#[derive(Debug, Clone)]
pub struct Watermark {
    delay_ms: i64,
    max_seen: Option<EventTime>,
}

impl Watermark {
    pub fn new(delay: Duration) -> Self {
        Watermark {
            delay_ms: delay.as_millis() as i64,
            max_seen: None,
        }
    }

    /// Record an observed event time.
    pub fn observe(&mut self, timestamp: EventTime) {
        self.max_seen = Some(match self.max_seen {
            Some(max) => max.max(timestamp),
            None => timestamp,
        });
    }

    /// `max_seen - delay`, or `None` before any event was observed.
    pub fn current(&self) -> Option<EventTime> {
        self.max_seen.map(|max| max.saturating_sub(self.delay_ms))
    }
}
