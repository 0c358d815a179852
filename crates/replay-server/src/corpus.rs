//! Message corpus loading.
//!
//! The corpus is read once at startup and never changes afterwards, so
//! sessions share it through an `Arc` without any locking.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::CorpusError;

/// Line served when no file contributed any message.
pub const FALLBACK_MESSAGE: &str = "No available messages.";

/// Immutable, non-empty, ordered set of messages.
#[derive(Debug, Clone)]
pub struct Corpus {
    messages: Arc<[String]>,
}

impl Corpus {
    /// Build a corpus from raw lines: each is trimmed, blank ones are
    /// dropped, and an empty result becomes the fallback corpus.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let messages: Vec<String> = lines
            .into_iter()
            .filter_map(|line| {
                let trimmed = line.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();

        if messages.is_empty() {
            return Corpus::fallback();
        }
        Corpus {
            messages: messages.into(),
        }
    }

    /// The single-message corpus used when nothing could be loaded.
    pub fn fallback() -> Self {
        Corpus {
            messages: Arc::from(vec![FALLBACK_MESSAGE.to_string()]),
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Read the trimmed, non-blank lines of one file.
pub fn read_messages(path: &Path) -> Result<Vec<String>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Load messages from `paths`, in order.
///
/// Missing or unreadable files are logged and skipped. If no message is
/// loaded at all the fallback corpus is returned.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Corpus {
    if paths.is_empty() {
        info!("No files provided. Using default message.");
        return Corpus::fallback();
    }

    let mut messages = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match read_messages(path) {
            Ok(lines) => {
                info!(path = %path.display(), "Loaded {} messages", lines.len());
                messages.extend(lines);
            }
            Err(err @ CorpusError::NotFound { .. }) => {
                warn!("{}. Skipping.", err);
            }
            Err(err) => {
                warn!("{}", err);
            }
        }
    }

    if messages.is_empty() {
        warn!("No messages loaded. Using default message.");
        return Corpus::fallback();
    }

    Corpus::from_lines(messages)
}
