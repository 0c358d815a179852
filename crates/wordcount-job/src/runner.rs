//! Micro-batch query loop.
//!
//! Each query runs as its own task: records accumulate between trigger
//! ticks, and every tick turns whatever arrived into one micro-batch.
//! When the source goes away the leftover records form a final batch and
//! the task returns.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use wordcount_core::{LineRecord, StreamingQuery};

use crate::error::JobError;
use crate::sink::{Batch, Sink};
use crate::source::LineRx;

/// Totals reported when a query terminates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryProgress {
    pub batches: u64,
    pub records: u64,
}

/// Drive `query` from `rx` until the channel closes.
pub async fn run_query<Q, S>(
    mut query: Q,
    mut rx: LineRx,
    trigger: Duration,
    mut sink: S,
) -> Result<QueryProgress, JobError>
where
    Q: StreamingQuery,
    S: Sink,
{
    // First batch one full trigger after start, not immediately.
    let mut ticker = interval_at(Instant::now() + trigger, trigger);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut pending: Vec<LineRecord> = Vec::new();
    let mut progress = QueryProgress::default();

    info!(query = query.name(), "Query started");

    loop {
        tokio::select! {
            received = rx.recv() => {
                match received {
                    Some(record) => pending.push(record),
                    None => break,
                }
            }
            _ = ticker.tick() => {
                run_batch(&mut query, &mut pending, &mut sink, &mut progress)?;
            }
        }
    }

    run_batch(&mut query, &mut pending, &mut sink, &mut progress)?;
    info!(
        query = query.name(),
        batches = progress.batches,
        records = progress.records,
        "Query terminated"
    );
    Ok(progress)
}

fn run_batch<Q, S>(
    query: &mut Q,
    pending: &mut Vec<LineRecord>,
    sink: &mut S,
    progress: &mut QueryProgress,
) -> Result<(), JobError>
where
    Q: StreamingQuery,
    S: Sink,
{
    if pending.is_empty() {
        return Ok(());
    }

    let rows = query.process_batch(pending);
    debug!(
        query = query.name(),
        batch = progress.batches,
        records = pending.len(),
        updated = rows.len(),
        "Batch processed"
    );

    sink.emit(&Batch {
        query: query.name(),
        batch_id: progress.batches,
        columns: query.columns(),
        rows: &rows,
    })?;

    progress.batches += 1;
    progress.records += pending.len() as u64;
    pending.clear();
    Ok(())
}
