use serde::{Deserialize, Serialize};

/// A normalized token with its UTF-8 byte offsets in the *original* text.
///
/// `text` is the post-normalization form (case-folded, stemmed, ...), while
/// `[start, end)` always slices the untouched input, so callers can recover
/// the exact characters the token was produced from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Byte offset (inclusive) in the original text.
    pub start: usize,
    /// Byte offset (exclusive) in the original text.
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Slice of the original text this token was read from.
    ///
    /// Returns `None` when the offsets do not fit `original`.
    pub fn source<'a>(&self, original: &'a str) -> Option<&'a str> {
        original.get(self.start..self.end)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Borrow just the normalized texts of a token slice.
pub fn token_texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
