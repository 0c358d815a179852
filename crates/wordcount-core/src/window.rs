//! Sliding event-time windows.

use std::fmt;
use std::time::Duration;

use crate::error::WindowError;
use crate::record::EventTime;

/// A half-open event-time window `[start, end)`.
///
/// Ordered by `start`, then `end`, which is also the order results are
/// emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeWindow {
    pub start: EventTime,
    pub end: EventTime,
}

impl TimeWindow {
    pub fn new(start: EventTime, end: EventTime) -> Self {
        TimeWindow { start, end }
    }

    /// Return true if `timestamp` falls inside this window.
    pub fn contains(&self, timestamp: EventTime) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Fixed-size, overlapping windows aligned to multiples of the slide.
///
/// A timestamp belongs to `ceil(size / slide)` windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingWindows {
    size_ms: i64,
    slide_ms: i64,
}

/// 10-second windows every 5 seconds.
pub const DEFAULT_WINDOWS: SlidingWindows = SlidingWindows {
    size_ms: 10_000,
    slide_ms: 5_000,
};

impl SlidingWindows {
    /// Windows of the given `size`, a new one starting every `slide`.
    pub fn of(size: Duration, slide: Duration) -> Result<Self, WindowError> {
        let size_ms = size.as_millis() as i64;
        let slide_ms = slide.as_millis() as i64;

        if size_ms <= 0 || slide_ms <= 0 {
            return Err(WindowError::ZeroDuration);
        }
        if slide_ms > size_ms {
            return Err(WindowError::SlideExceedsSize { size_ms, slide_ms });
        }

        Ok(SlidingWindows { size_ms, slide_ms })
    }

    pub fn size_ms(&self) -> i64 {
        self.size_ms
    }

    pub fn slide_ms(&self) -> i64 {
        self.slide_ms
    }

    /// All windows containing `timestamp`, oldest first.
    pub fn assign(&self, timestamp: EventTime) -> Vec<TimeWindow> {
        let last_start = timestamp - timestamp.rem_euclid(self.slide_ms);

        let mut windows = Vec::with_capacity((self.size_ms / self.slide_ms + 1) as usize);
        let mut start = last_start;
        while start > timestamp - self.size_ms {
            windows.push(TimeWindow::new(start, start + self.size_ms));
            start -= self.slide_ms;
        }
        windows.reverse();
        windows
    }
}
