//! Fixed stop-word set dropped before counting.

/// Stop words, sorted so membership is a binary search.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "com",
    "for", "from", "has", "he", "how", "http", "https", "i", "if", "in",
    "is", "it", "its", "not", "of", "on", "or", "so", "that", "the",
    "they", "this", "to", "was", "we", "were", "what", "when", "which", "who",
    "will", "with", "www", "you", "your",
];

/// Returns true if `word` (already lower-cased) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}
