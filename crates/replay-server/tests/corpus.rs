// crates/replay-server/tests/corpus.rs
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use replay_server::corpus::{load_corpus, read_messages, Corpus, FALLBACK_MESSAGE};
use replay_server::CorpusError;

/// Shared in-memory log sink for a test subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

/// Run `f` with a WARN-level subscriber and return what it logged.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.lines())
}

#[test]
fn loads_non_blank_lines_and_skips_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "first line\n\n   second line  \n").unwrap();
    let missing = dir.path().join("missing.txt");

    let (corpus, logs) = capture_warnings(|| load_corpus(&[a, missing]));

    assert_eq!(corpus.messages(), &["first line", "second line"]);
    assert_eq!(logs.len(), 1, "unexpected log output: {:?}", logs);
    assert!(logs[0].contains("WARN"));
    assert!(logs[0].contains("missing.txt"));
    assert!(logs[0].contains("Skipping"));
}

#[test]
fn concatenates_files_in_argument_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "a1\na2\n").unwrap();
    fs::write(&b, "b1\r\n").unwrap();

    let corpus = load_corpus(&[b, a]);

    assert_eq!(corpus.messages(), &["b1", "a1", "a2"]);
    assert_eq!(corpus.len(), 3);
}

#[test]
fn no_files_gives_fallback() {
    let corpus = load_corpus::<PathBuf>(&[]);
    assert_eq!(corpus.messages(), &[FALLBACK_MESSAGE]);
}

#[test]
fn empty_and_unreadable_files_give_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "\n   \n\t\n").unwrap();
    let binary = dir.path().join("binary.dat");
    fs::write(&binary, [0xffu8, 0xfe, 0x00, 0x80]).unwrap();

    let (corpus, logs) =
        capture_warnings(|| load_corpus(&[empty, binary, dir.path().join("nope.txt")]));

    assert_eq!(corpus.messages(), &[FALLBACK_MESSAGE]);
    assert!(!corpus.is_empty());

    let warned = |needle: &str| logs.iter().any(|l| l.contains("WARN") && l.contains(needle));
    assert!(warned("binary.dat"), "no warning for unreadable file: {:?}", logs);
    assert!(warned("nope.txt"), "no warning for missing file: {:?}", logs);
    assert!(warned("No messages loaded"), "no fallback warning: {:?}", logs);
}

#[test]
fn read_messages_reports_missing_and_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.txt");
    assert!(matches!(
        read_messages(&missing),
        Err(CorpusError::NotFound { path }) if path == missing
    ));

    let binary = dir.path().join("binary.dat");
    fs::write(&binary, [0xc3u8, 0x28]).unwrap();
    assert!(matches!(read_messages(&binary), Err(CorpusError::Read { .. })));

    // A directory exists but cannot be read as a file.
    assert!(matches!(read_messages(dir.path()), Err(CorpusError::Read { .. })));
}

#[test]
fn from_lines_trims_and_falls_back() {
    let corpus = Corpus::from_lines(["  hello  ", "", "world"]);
    assert_eq!(corpus.messages(), &["hello", "world"]);

    let corpus = Corpus::from_lines(Vec::<String>::new());
    assert_eq!(corpus.messages(), &[FALLBACK_MESSAGE]);
}
