// crates/wordcount-job/tests/job.rs
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use wordcount_core::{Cell, LineRecord, MessageCountQuery, Row, WordCountQuery};
use wordcount_job::{
    run_job, run_query, Batch, ConsoleSink, JobError, OutputFormat, Sink, SocketSource,
};

#[derive(Debug, Clone)]
struct Collected {
    query: String,
    batch_id: u64,
    rows: Vec<Row>,
}

#[derive(Clone, Default)]
struct CollectingSink {
    batches: Arc<Mutex<Vec<Collected>>>,
}

impl Sink for CollectingSink {
    fn emit(&mut self, batch: &Batch<'_>) -> Result<(), JobError> {
        self.batches.lock().unwrap().push(Collected {
            query: batch.query.to_string(),
            batch_id: batch.batch_id,
            rows: batch.rows.to_vec(),
        });
        Ok(())
    }
}

impl CollectingSink {
    fn take(&self) -> Vec<Collected> {
        self.batches.lock().unwrap().clone()
    }
}

/// Every word that appeared in any update of the word query.
fn words_seen(batches: &[Collected]) -> BTreeSet<String> {
    batches
        .iter()
        .flat_map(|b| &b.rows)
        .filter_map(|row| match &row[0] {
            Cell::Text(word) => Some(word.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn job_counts_words_and_messages_from_a_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream
            .write_all(b"Rust is fast\r\nrust, RUST and more rust!\nthe a an\n")
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });

    let source = SocketSource::connect("127.0.0.1", port).await.unwrap();
    let words = CollectingSink::default();
    let messages = CollectingSink::default();

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        run_job(source, Duration::from_secs(60), words.clone(), messages.clone()),
    )
    .await
    .unwrap()
    .unwrap();
    server.await.unwrap();

    assert_eq!(summary.lines, 3);
    assert_eq!(summary.word_counts.records, 3);
    assert_eq!(summary.message_counts.records, 3);

    let word_batches = words.take();
    assert!(word_batches.iter().all(|b| b.query == "word_counts"));

    let seen: Vec<String> = words_seen(&word_batches).into_iter().collect();
    assert_eq!(seen, vec!["fast", "more", "rust"]);

    let message_batches = messages.take();
    assert!(!message_batches.is_empty());
    assert!(message_batches.iter().all(|b| b.query == "message_counts"));
    let max_count = message_batches
        .iter()
        .flat_map(|b| &b.rows)
        .filter_map(|row| match row[0] {
            Cell::Count(n) => Some(n),
            _ => None,
        })
        .max()
        .unwrap();
    assert!((1..=3).contains(&max_count));
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = SocketSource::connect("127.0.0.1", port).await.err().unwrap();
    assert!(matches!(err, JobError::Connect { .. }));
}

#[tokio::test(start_paused = true)]
async fn runner_emits_one_batch_per_trigger_with_pending_records() {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = CollectingSink::default();
    let task = tokio::spawn(run_query(
        MessageCountQuery::new(),
        rx,
        Duration::from_millis(100),
        sink.clone(),
    ));

    tx.send(LineRecord::new("first", 1_000)).unwrap();
    tx.send(LineRecord::new("second", 1_500)).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Nothing new: idle ticks do not produce batches.
    tokio::time::sleep(Duration::from_millis(500)).await;

    tx.send(LineRecord::new("third", 6_000)).unwrap();
    drop(tx);

    let progress = task.await.unwrap().unwrap();
    assert_eq!(progress.records, 3);
    assert_eq!(progress.batches, 2);

    let batches = sink.take();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].batch_id, 0);
    assert_eq!(
        batches[0].rows,
        vec![
            vec![Cell::Count(2), Cell::Timestamp(-5_000), Cell::Timestamp(5_000)],
            vec![Cell::Count(2), Cell::Timestamp(0), Cell::Timestamp(10_000)],
        ]
    );
    assert_eq!(batches[1].batch_id, 1);
    assert_eq!(
        batches[1].rows,
        vec![
            vec![Cell::Count(3), Cell::Timestamp(0), Cell::Timestamp(10_000)],
            vec![Cell::Count(1), Cell::Timestamp(5_000), Cell::Timestamp(15_000)],
        ]
    );
}

#[tokio::test]
async fn batch_with_only_filtered_words_still_reports_an_empty_update() {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = CollectingSink::default();

    tx.send(LineRecord::new("the and of a", 1_000)).unwrap();
    drop(tx);

    let progress = run_query(WordCountQuery::new(), rx, Duration::from_secs(60), sink.clone())
        .await
        .unwrap();

    assert_eq!(progress.batches, 1);
    let batches = sink.take();
    assert_eq!(batches.len(), 1);
    assert!(batches[0].rows.is_empty());
}

#[test]
fn console_sink_writes_tables_and_json() {
    let rows = vec![vec![
        Cell::Text("rust".to_string()),
        Cell::Count(4),
        Cell::Timestamp(0),
        Cell::Timestamp(10_000),
    ]];
    let batch = Batch {
        query: "word_counts",
        batch_id: 5,
        columns: &["word", "count", "window_start", "window_end"],
        rows: &rows,
    };

    let mut table = ConsoleSink::new(Vec::new(), OutputFormat::Table);
    table.emit(&batch).unwrap();
    let text = String::from_utf8(table.into_inner()).unwrap();
    assert!(text.contains("Batch: 5\n"));
    assert!(text.contains("|rust|4    |1970-01-01 00:00:00|1970-01-01 00:00:10|\n"));

    let mut json = ConsoleSink::new(Vec::new(), OutputFormat::Json);
    json.emit(&batch).unwrap();
    let line = String::from_utf8(json.into_inner()).unwrap();
    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["query"], "word_counts");
    assert_eq!(value["batch"], 5);
    assert_eq!(value["rows"][0]["word"], "rust");
    assert_eq!(value["rows"][0]["count"], 4);
    assert_eq!(value["rows"][0]["window_end"], "1970-01-01 00:00:10");
}
