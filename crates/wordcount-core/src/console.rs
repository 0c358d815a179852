//! Console rendering of micro-batch results.
//!
//! Output format, one block per batch:
//!
//! ```text
//! -------------------------------------------
//! Batch: 3
//! -------------------------------------------
//! +-----+-----+-------------------+-------------------+
//! |word |count|window_start       |window_end         |
//! +-----+-----+-------------------+-------------------+
//! |rust |2    |2024-05-01 10:00:05|2024-05-01 10:00:15|
//! +-----+-----+-------------------+-------------------+
//! ```
//!
//! Cells are never truncated and are left-aligned. This is meant for
//! humans; it is not a stable machine-readable format.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::query::Row;
use crate::record::EventTime;

const MIN_COLUMN_WIDTH: usize = 3;
const BANNER: &str = "-------------------------------------------";

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Out-of-range values fall back to the raw number.
pub fn format_timestamp(ts: EventTime) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

/// Render one batch as a banner followed by an ASCII table.
pub fn format_batch(batch_id: u64, columns: &[&str], rows: &[Row]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let separator = separator_line(&widths);

    let mut out = String::new();
    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "Batch: {}", batch_id);
    let _ = writeln!(out, "{}", BANNER);
    out.push_str(&separator);
    out.push_str(&table_line(columns.iter().copied(), &widths));
    out.push_str(&separator);
    for row in &cells {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    if !cells.is_empty() {
        out.push_str(&separator);
    }
    out.push('\n');
    out
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(*w));
        line.push('+');
    }
    line.push('\n');
    line
}

fn table_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (value, w) in values.zip(widths) {
        let _ = write!(line, "{:<width$}|", value, width = *w);
    }
    line.push('\n');
    line
}
