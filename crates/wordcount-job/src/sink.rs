//! Query output sinks.
//!
//! Every query writes its micro-batch results through a [`Sink`]. The
//! console sink prints either the human-readable table or one JSON object
//! per batch; neither is a stable contract.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};

use wordcount_core::console::{format_batch, format_timestamp};
use wordcount_core::{Cell, Row};

use crate::error::JobError;

/// Rows updated by one micro-batch of one query.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub query: &'a str,
    pub batch_id: u64,
    pub columns: &'a [&'a str],
    pub rows: &'a [Row],
}

/// Destination for query results.
pub trait Sink: Send {
    fn emit(&mut self, batch: &Batch<'_>) -> Result<(), JobError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Banner and ASCII table per batch
    Table,
    /// One JSON object per batch
    Json,
}

/// Writes batches to a `Write`r, stdout by default.
pub struct ConsoleSink<W> {
    out: W,
    format: OutputFormat,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        ConsoleSink::new(io::stdout(), format)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        ConsoleSink { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn emit(&mut self, batch: &Batch<'_>) -> Result<(), JobError> {
        let text = match self.format {
            OutputFormat::Table => format_batch(batch.batch_id, batch.columns, batch.rows),
            OutputFormat::Json => {
                let mut line = serde_json::to_string(&JsonBatch::from(batch))?;
                line.push('\n');
                line
            }
        };

        // One write per batch so concurrent queries never interleave.
        self.out.write_all(text.as_bytes()).map_err(JobError::Sink)?;
        self.out.flush().map_err(JobError::Sink)
    }
}

#[derive(Serialize)]
struct JsonBatch<'a> {
    query: &'a str,
    batch: u64,
    rows: Vec<Map<String, Value>>,
}

impl<'a> From<&Batch<'a>> for JsonBatch<'a> {
    fn from(batch: &Batch<'a>) -> Self {
        let rows = batch
            .rows
            .iter()
            .map(|row| {
                batch
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.to_string(), cell_value(cell)))
                    .collect()
            })
            .collect();

        JsonBatch {
            query: batch.query,
            batch: batch.batch_id,
            rows,
        }
    }
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Count(n) => Value::from(*n),
        Cell::Timestamp(ts) => Value::String(format_timestamp(*ts)),
    }
}
