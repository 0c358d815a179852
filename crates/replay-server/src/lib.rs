//! replay-server
//!
//! Multi-client async TCP server that replays a text corpus line by
//! line to every connected client, simulating a message source.

pub mod config;
pub mod corpus;
pub mod error;
pub mod server;
pub mod session;
pub mod types;

pub use config::{Args, Config};
pub use corpus::{load_corpus, Corpus};
pub use error::{ConfigError, CorpusError, ServerError};
pub use server::{serve, ReplayServer};
pub use session::{handle_session, DelayRange, SessionSettings};
pub use types::{SessionId, SessionOutcome};
