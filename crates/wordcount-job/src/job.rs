//! Job wiring: one source, two independent queries.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use wordcount_core::{MessageCountQuery, WordCountQuery};

use crate::error::JobError;
use crate::runner::{run_query, QueryProgress};
use crate::sink::Sink;
use crate::source::SocketSource;

/// What the job processed before the source closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    pub lines: u64,
    pub word_counts: QueryProgress,
    pub message_counts: QueryProgress,
}

/// Start `word_counts` and `message_counts` over `source` and wait for
/// both to terminate.
pub async fn run_job<W, M>(
    source: SocketSource,
    trigger: Duration,
    word_sink: W,
    message_sink: M,
) -> Result<JobSummary, JobError>
where
    W: Sink + 'static,
    M: Sink + 'static,
{
    let (word_tx, word_rx) = mpsc::unbounded_channel();
    let (message_tx, message_rx) = mpsc::unbounded_channel();

    let word_query = tokio::spawn(run_query(WordCountQuery::new(), word_rx, trigger, word_sink));
    let message_query = tokio::spawn(run_query(
        MessageCountQuery::new(),
        message_rx,
        trigger,
        message_sink,
    ));
    let source_task = tokio::spawn(source.run(vec![word_tx, message_tx]));

    let word_counts = await_task("word_counts", word_query).await?;
    let message_counts = await_task("message_counts", message_query).await?;
    let lines = await_task("source", source_task).await?;

    info!(lines, "Job finished");
    Ok(JobSummary {
        lines,
        word_counts,
        message_counts,
    })
}

async fn await_task<T>(
    name: &'static str,
    handle: JoinHandle<Result<T, JobError>>,
) -> Result<T, JobError> {
    handle.await.map_err(|e| JobError::Task {
        name,
        reason: e.to_string(),
    })?
}
