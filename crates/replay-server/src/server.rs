//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Binds the configured address with `SO_REUSEADDR`.
//! - Accepts new TCP connections until shutdown.
//! - Assigns each connection a `SessionId`.
//! - Spawns one task per connection, at most `max_sessions` at a time;
//!   connections beyond the limit are rejected.
//!
//! The per-connection replay loop lives in the `session` module.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::{lookup_host, TcpListener, TcpSocket, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::ServerError;
use crate::session::{handle_session, SessionSettings};
use crate::types::SessionId;

const LISTEN_BACKLOG: u32 = 128;

/// Pause after a failed `accept` (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Global-ish counter for assigning unique `SessionId`s.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
}

/// A bound, not yet serving, replay server.
pub struct ReplayServer {
    listener: TcpListener,
    corpus: Corpus,
    settings: SessionSettings,
    permits: Arc<Semaphore>,
    max_sessions: usize,
    seed: Option<u64>,
}

impl ReplayServer {
    /// Validate `config` and bind its address.
    pub async fn bind(config: &Config, corpus: Corpus) -> Result<Self, ServerError> {
        config.validate()?;
        let settings = config.session_settings()?;

        let addr = config.socket_addr_string();
        let listener = bind_listener(&addr).await?;
        info!(address = %addr, messages = corpus.len(), "Starting replay server");

        Ok(ReplayServer {
            listener,
            corpus,
            settings,
            permits: Arc::new(Semaphore::new(config.max_sessions)),
            max_sessions: config.max_sessions,
            seed: config.seed,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of sessions currently being served.
    pub fn active_sessions(&self) -> usize {
        self.max_sessions - self.permits.available_permits()
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Sessions still running at shutdown are not drained; they end with
    /// the runtime.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            debug!("Waiting for connections");
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Server interrupted");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => self.spawn_session(stream, peer),
                        Err(e) => {
                            error!(error = %e, "Accept failed");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
            }
        }

        drop(self.listener);
        info!("Server shut down");
        Ok(())
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    peer = %peer,
                    max_sessions = self.max_sessions,
                    "Rejecting connection: max_sessions reached"
                );
                // Just drop the stream; client will see the connection closed.
                return;
            }
        };

        let session = next_session_id();
        info!(session = session.0, peer = %peer, "Connection accepted");

        let corpus = self.corpus.clone();
        let settings = self.settings;
        let mut rng = session_rng(self.seed, session);

        tokio::spawn(async move {
            let outcome = handle_session(session, stream, &corpus, &settings, &mut rng).await;
            debug!(session = session.0, ?outcome, "Session ended");
            drop(permit);
        });
    }
}

/// Run the replay server with the given configuration until Ctrl+C or
/// SIGTERM.
pub async fn serve(config: Config, corpus: Corpus) -> Result<(), ServerError> {
    let server = ReplayServer::bind(&config, corpus).await?;
    server.serve_until(shutdown_signal()).await
}

fn session_rng(seed: Option<u64>, session: SessionId) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ session.0),
        None => StdRng::from_entropy(),
    }
}

async fn bind_listener(addr: &str) -> Result<TcpListener, ServerError> {
    let candidates = lookup_host(addr).await.map_err(|source| ServerError::Resolve {
        addr: addr.to_string(),
        source,
    })?;

    let mut last_err = None;
    for candidate in candidates {
        match bind_reuse(candidate) {
            Ok(listener) => return Ok(listener),
            Err(e) => last_err = Some(e),
        }
    }

    Err(ServerError::Bind {
        addr: addr.to_string(),
        source: last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved")
        }),
    })
}

fn bind_reuse(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(LISTEN_BACKLOG)
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
