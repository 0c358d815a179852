//! Shared types for the replay server.

use std::io;

/// Identifier for an accepted connection.
///
/// Unique over the lifetime of the process; also mixed into the
/// session's random seed when the server runs with `--seed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every message was sent once (no-repeat mode) and the connection
    /// was closed by us.
    Completed { sent: u64 },

    /// The peer went away (broken pipe, reset, aborted).
    PeerClosed { sent: u64 },

    /// Any other write failure.
    Failed { sent: u64, kind: io::ErrorKind },
}

impl SessionOutcome {
    /// Number of messages fully written before the session ended.
    pub fn sent(&self) -> u64 {
        match self {
            SessionOutcome::Completed { sent }
            | SessionOutcome::PeerClosed { sent }
            | SessionOutcome::Failed { sent, .. } => *sent,
        }
    }
}
