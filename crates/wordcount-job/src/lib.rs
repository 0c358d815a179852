//! wordcount-job
//!
//! Streaming job reading lines from a TCP source and running two
//! windowed queries over them:
//! - [`source`] : socket ingestion and fan-out to the queries
//! - [`runner`] : micro-batch loop driving one query
//! - [`sink`]   : console output (table or JSON lines)
//! - [`job`]    : wiring of source, queries and sinks

pub mod error;
pub mod job;
pub mod runner;
pub mod sink;
pub mod source;

pub use error::JobError;
pub use job::{run_job, JobSummary};
pub use runner::{run_query, QueryProgress};
pub use sink::{Batch, ConsoleSink, OutputFormat, Sink};
pub use source::SocketSource;
