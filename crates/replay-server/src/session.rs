//! Per-connection replay loop.
//!
//! A session walks the corpus with its own cursor, starting at 0:
//! send the current line, advance modulo the corpus length, sleep a
//! random delay, repeat. In no-repeat mode the session ends right after
//! the last line instead of sleeping.

use std::io;
use std::time::Duration;

use rand::Rng;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::error::ConfigError;
use crate::types::{SessionId, SessionOutcome};

/// Longest message prefix shown in the `Sending:` log line.
const LOG_PREVIEW_CHARS: usize = 50;

/// Inclusive bounds for the delay between two messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::DelayRangeInverted { min, max });
        }
        Ok(DelayRange { min, max })
    }

    /// Build from seconds, rejecting negative, NaN and infinite values.
    pub fn from_secs_f64(min: f64, max: f64) -> Result<Self, ConfigError> {
        let min = Duration::try_from_secs_f64(min).map_err(|_| ConfigError::InvalidDelay {
            name: "delay-min",
            value: min,
        })?;
        let max = Duration::try_from_secs_f64(max).map_err(|_| ConfigError::InvalidDelay {
            name: "delay-max",
            value: max,
        })?;
        DelayRange::new(min, max)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a delay uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        rng.gen_range(self.min..=self.max)
    }
}

/// Settings fixed at server start and identical for all sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub repeat: bool,
    pub delay: DelayRange,
}

/// Replay `corpus` to `writer` until the peer goes away, a write fails,
/// or (without repeat) every message was sent once.
///
/// The writer is shut down or dropped before returning in every case.
pub async fn handle_session<W, R>(
    session: SessionId,
    mut writer: W,
    corpus: &Corpus,
    settings: &SessionSettings,
    rng: &mut R,
) -> SessionOutcome
where
    W: AsyncWrite + Unpin,
    R: Rng + ?Sized,
{
    let messages = corpus.messages();
    let mut index = 0usize;
    let mut sent = 0u64;

    info!(session = session.0, "Client connected, sending messages");

    loop {
        let message = &messages[index];
        debug!(session = session.0, "Sending: {}", preview(message));

        if let Err(err) = send_line(&mut writer, message).await {
            return if is_peer_closed(&err) {
                info!(session = session.0, sent, "Client disconnected");
                SessionOutcome::PeerClosed { sent }
            } else {
                warn!(session = session.0, sent, error = %err, "Send failed, closing connection");
                SessionOutcome::Failed {
                    sent,
                    kind: err.kind(),
                }
            };
        }
        sent += 1;

        index = (index + 1) % messages.len();
        if !settings.repeat && index == 0 {
            info!(session = session.0, sent, "All messages sent. Closing connection.");
            let _ = writer.shutdown().await;
            return SessionOutcome::Completed { sent };
        }

        tokio::time::sleep(settings.delay.sample(rng)).await;
    }
}

async fn send_line<W: AsyncWrite + Unpin>(writer: &mut W, message: &str) -> io::Result<()> {
    let data = format!("{}\n", message);
    writer.write_all(data.as_bytes()).await?;
    writer.flush().await
}

fn is_peer_closed(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
    )
}

fn preview(message: &str) -> String {
    match message.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
