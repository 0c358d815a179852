//! Binary TCP server replaying text files to every client.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use replay_server::config::{Args, Config};
use replay_server::{corpus, server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args(Args::parse()).context("invalid configuration")?;

    let files = if config.files.is_empty() {
        "default message".to_string()
    } else {
        config
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    info!(
        host = %config.host,
        port = config.port,
        files = %files,
        repeat = config.repeat,
        delay_min = config.delay_min,
        delay_max = config.delay_max,
        max_sessions = config.max_sessions,
        "Configuration"
    );

    let corpus = corpus::load_corpus(config.files.as_slice());

    server::serve(config, corpus)
        .await
        .context("replay server failed")
}
