//! Text cleaning and tokenization.
//!
//! A line goes through three steps before it is counted:
//! 1. [`clean_text`]: anything that is not an ASCII letter, digit or
//!    whitespace becomes a space, then the text is lower-cased.
//! 2. [`tokenize`]: the cleaned text is split on whitespace.
//! 3. [`is_countable`]: tokens of one character and stop words are dropped.
//!
//! [`extract_words`] chains all three for a [`LineRecord`].

use crate::record::{LineRecord, WordRecord};
use crate::stop_words::is_stop_word;

/// Replace non-alphanumeric characters with spaces and lower-case the rest.
///
/// Only ASCII letters and digits survive; accented letters and other
/// non-ASCII characters are treated like punctuation.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || is_regex_whitespace(c) {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect()
}

// Same set as the `\s` character class.
fn is_regex_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Split cleaned text into tokens.
pub fn tokenize(cleaned: &str) -> impl Iterator<Item = &str> {
    cleaned.split_whitespace()
}

/// Returns true for tokens that should be counted.
pub fn is_countable(token: &str) -> bool {
    token.chars().count() > 1 && !is_stop_word(token)
}

/// Clean, tokenize and filter a line, yielding one record per kept word.
pub fn extract_words(line: &LineRecord) -> Vec<WordRecord<'_>> {
    let cleaned = clean_text(&line.original_text);
    tokenize(&cleaned)
        .filter(|token| is_countable(token))
        .map(|token| WordRecord {
            word: token.to_string(),
            line,
        })
        .collect()
}
