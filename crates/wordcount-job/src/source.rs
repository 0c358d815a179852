//! Socket text source.
//!
//! Connects to a line-oriented TCP server, stamps every line with its
//! ingestion time and length, and hands a copy to each query.

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wordcount_core::{EventTime, LineRecord};

use crate::error::JobError;

/// Channel from the source into one query.
pub type LineTx = mpsc::UnboundedSender<LineRecord>;
pub type LineRx = mpsc::UnboundedReceiver<LineRecord>;

/// A connected source reading `\n`-terminated lines.
pub struct SocketSource {
    addr: String,
    reader: BufReader<TcpStream>,
}

impl SocketSource {
    /// Connect to `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self, JobError> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| JobError::Connect {
                addr: addr.clone(),
                source,
            })?;

        info!(address = %addr, "Connected to source");
        Ok(SocketSource {
            addr,
            reader: BufReader::new(stream),
        })
    }

    /// Read until the peer closes, fanning each line out to `outputs`.
    ///
    /// Returns the number of lines read. Dropping `outputs` on return is
    /// what lets the queries finish.
    pub async fn run(mut self, outputs: Vec<LineTx>) -> Result<u64, JobError> {
        let mut buf = Vec::with_capacity(1024);
        let mut lines = 0u64;

        loop {
            buf.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(JobError::Read)?;
            if n == 0 {
                info!(address = %self.addr, lines, "Source closed");
                break;
            }

            let text = String::from_utf8_lossy(strip_line_ending(&buf));
            let record = LineRecord::new(text, now_millis());
            debug!(text = %record.original_text, "Received line");
            lines += 1;

            let mut delivered = false;
            for tx in &outputs {
                delivered |= tx.send(record.clone()).is_ok();
            }
            if !delivered {
                warn!("All queries stopped, closing source");
                break;
            }
        }

        Ok(lines)
    }
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

fn now_millis() -> EventTime {
    Utc::now().timestamp_millis()
}
