// crates/wordcount-job/src/main.rs

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wordcount_job::{run_job, ConsoleSink, OutputFormat, SocketSource};

#[derive(Parser)]
#[command(name = "wordcount-job")]
#[command(about = "Windowed word and message counts over a line-oriented TCP source")]
struct Cli {
    /// Host of the line source (e.g. a running replay-server)
    hostname: String,

    /// Port of the line source
    port: u16,

    /// How often pending lines are turned into a micro-batch
    #[arg(long, default_value_t = 1000)]
    trigger_interval_ms: u64,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the query output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let source = SocketSource::connect(&cli.hostname, cli.port)
        .await
        .context("failed to start source")?;

    let trigger = Duration::from_millis(cli.trigger_interval_ms.max(1));
    let summary = run_job(
        source,
        trigger,
        ConsoleSink::stdout(cli.format),
        ConsoleSink::stdout(cli.format),
    )
    .await
    .context("streaming job failed")?;

    info!(
        lines = summary.lines,
        word_batches = summary.word_counts.batches,
        message_batches = summary.message_counts.batches,
        "Source exhausted, queries terminated"
    );
    Ok(())
}
