//! Whitespace normalization for extracted document text.
//!
//! Readers use [`collapse_whitespace`] after stripping markup so that layout
//! whitespace (indentation, blank lines) never reaches the tokenizer as
//! separate runs.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  hello \n\n\t world  "), "hello world");
//! assert_eq!(collapse_whitespace("   "), "");
//! ```

/// Collapses repeated Unicode whitespace into single ASCII spaces and trims
/// both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
        assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
        assert_eq!(collapse_whitespace("hello"), "hello");
    }
}
