//! Configuration for the replay server.
//!
//! Every option is a command-line flag; the scalar ones can also be set
//! through the environment:
//!
//! - `REPLAY_HOST`         (default: "localhost")
//! - `REPLAY_PORT`         (default: "9999")
//! - `REPLAY_DELAY_MIN`    (default: "0.5", seconds)
//! - `REPLAY_DELAY_MAX`    (default: "2.0", seconds)
//! - `REPLAY_MAX_SESSIONS` (default: "1024")
//! - `REPLAY_SEED`         (default: unset, sessions seed from OS entropy)

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::Semaphore;

use crate::error::ConfigError;
use crate::session::{DelayRange, SessionSettings};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "replay-server")]
#[command(about = "TCP server replaying text files line by line, simulating a message source")]
pub struct Args {
    /// Host to bind
    #[arg(long, env = "REPLAY_HOST", default_value = "localhost")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "REPLAY_PORT", default_value_t = 9999)]
    pub port: u16,

    /// Text files to use as data source (e.g. --file *.txt)
    #[arg(long = "file", value_name = "PATH", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Repeat messages when the end of the files is reached (default)
    #[arg(long, conflicts_with = "no_repeat")]
    pub repeat: bool,

    /// Close each connection after the last message
    #[arg(long)]
    pub no_repeat: bool,

    /// Minimum delay between messages (seconds)
    #[arg(long, env = "REPLAY_DELAY_MIN", default_value_t = 0.5)]
    pub delay_min: f64,

    /// Maximum delay between messages (seconds)
    #[arg(long, env = "REPLAY_DELAY_MAX", default_value_t = 2.0)]
    pub delay_max: f64,

    /// Maximum number of simultaneously served clients
    #[arg(long, env = "REPLAY_MAX_SESSIONS", default_value_t = 1024)]
    pub max_sessions: usize,

    /// Seed for the inter-message delay generator (reproducible runs)
    #[arg(long, env = "REPLAY_SEED")]
    pub seed: Option<u64>,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host name or IP address to bind to (e.g. "localhost" or "0.0.0.0").
    pub host: String,

    /// TCP port to listen on. `0` picks an ephemeral port.
    pub port: u16,

    /// Corpus files, in the order their lines are replayed.
    pub files: Vec<PathBuf>,

    /// Start over after the last message instead of closing.
    pub repeat: bool,

    /// Inter-message delay bounds, in seconds.
    pub delay_min: f64,
    pub delay_max: f64,

    /// Maximum number of simultaneously connected clients.
    pub max_sessions: usize,

    /// Fixed seed for delay sampling; `None` means OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "localhost".to_string(),
            port: 9999,
            files: Vec::new(),
            repeat: true,
            delay_min: 0.5,
            delay_max: 2.0,
            max_sessions: 1024,
            seed: None,
        }
    }
}

impl Config {
    /// Build and validate a `Config` from parsed arguments.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let config = Config {
            host: args.host,
            port: args.port,
            files: args.files,
            repeat: !args.no_repeat,
            delay_min: args.delay_min,
            delay_max: args.delay_max,
            max_sessions: args.max_sessions,
            seed: args.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check delay bounds and the session limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session_settings()?;
        if self.max_sessions == 0 {
            return Err(ConfigError::ZeroMaxSessions);
        }
        if self.max_sessions > Semaphore::MAX_PERMITS {
            return Err(ConfigError::MaxSessionsTooLarge {
                value: self.max_sessions,
                max: Semaphore::MAX_PERMITS,
            });
        }
        Ok(())
    }

    /// Per-session settings shared by every connection.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        Ok(SessionSettings {
            repeat: self.repeat,
            delay: DelayRange::from_secs_f64(self.delay_min, self.delay_max)?,
        })
    }

    /// Convenience: `host:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
