//! Update-mode windowed counting.
//!
//! [`WindowedCounter`] is driven one micro-batch at a time:
//! - every row is counted in each sliding window that contains it,
//! - only groups touched by the batch are returned (update mode),
//! - after the batch the watermark advances and windows that ended at or
//!   before it are evicted.
//!
//! The watermark used to drop late rows in a batch is the one computed at
//! the end of the previous batch, so a batch never drops its own rows
//! based on a newer timestamp it contains.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::record::{EventTime, WindowedCount};
use crate::watermark::Watermark;
use crate::window::{SlidingWindows, TimeWindow};

/// Per-(window, key) counts with watermark-based eviction.
#[derive(Debug)]
pub struct WindowedCounter<K> {
    windows: SlidingWindows,
    tracker: Watermark,

    /// Watermark in effect for the current batch.
    watermark: Option<EventTime>,

    /// (window, key) -> count, ordered for deterministic emission.
    state: BTreeMap<(TimeWindow, K), u64>,
}

impl<K: Ord + Clone> WindowedCounter<K> {
    pub fn new(windows: SlidingWindows, watermark_delay: Duration) -> Self {
        WindowedCounter {
            windows,
            tracker: Watermark::new(watermark_delay),
            watermark: None,
            state: BTreeMap::new(),
        }
    }

    /// Count one micro-batch of `(event_time, key)` rows and return the
    /// groups whose count changed, ordered by window then key.
    pub fn process_batch<I>(&mut self, rows: I) -> Vec<WindowedCount<K>>
    where
        I: IntoIterator<Item = (EventTime, K)>,
    {
        let mut touched: BTreeSet<(TimeWindow, K)> = BTreeSet::new();

        for (timestamp, key) in rows {
            self.tracker.observe(timestamp);

            for window in self.windows.assign(timestamp) {
                if self.is_expired(&window) {
                    continue;
                }
                let group = (window, key.clone());
                *self.state.entry(group.clone()).or_insert(0) += 1;
                touched.insert(group);
            }
        }

        let updates = touched
            .into_iter()
            .filter_map(|group| {
                let count = *self.state.get(&group)?;
                let (window, key) = group;
                Some(WindowedCount { key, count, window })
            })
            .collect();

        self.advance_watermark();
        updates
    }

    /// Watermark that will apply to the next batch.
    pub fn watermark(&self) -> Option<EventTime> {
        self.watermark
    }

    /// Number of (window, key) groups currently retained.
    pub fn state_len(&self) -> usize {
        self.state.len()
    }

    fn is_expired(&self, window: &TimeWindow) -> bool {
        matches!(self.watermark, Some(wm) if window.end <= wm)
    }

    fn advance_watermark(&mut self) {
        let Some(candidate) = self.tracker.current() else {
            return;
        };

        // Never moves backwards.
        let wm = match self.watermark {
            Some(current) => current.max(candidate),
            None => candidate,
        };
        self.watermark = Some(wm);
        self.state.retain(|(window, _), _| window.end > wm);
    }
}
