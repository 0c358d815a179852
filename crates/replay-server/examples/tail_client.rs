//! Example: connect to a running replay server and print what it sends.
//!
//! Usage:
//!
//! ```bash
//! # Run server
//! cargo run -p replay-server -- --file corpus/*.txt --delay-min 0.1 --delay-max 0.3
//!
//! # In another terminal, print the first 20 lines
//! cargo run -p replay-server --example tail_client -- 20
//! ```
//!
//! `REPLAY_CLIENT_ADDR` overrides the default `127.0.0.1:9999`.

use std::env;
use std::error::Error;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let addr = env::var("REPLAY_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9999".to_string());
    let limit: Option<u64> = env::args().nth(1).map(|n| n.parse()).transpose()?;

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");

    let mut lines = BufReader::new(stream).lines();
    let mut received = 0u64;

    while let Some(line) = lines.next_line().await? {
        received += 1;
        println!("<< [{}] {}", received, line);

        if limit.is_some_and(|max| received >= max) {
            break;
        }
    }

    println!("Received {} lines, exiting.", received);
    Ok(())
}
