//! Normalized view of a token stream.
//!
//! The view is the token texts joined by single spaces. Every character of the
//! view remembers the byte range in the original snapshot it came from:
//! token characters map into their token's `[start, end)` range and the
//! separator between two tokens maps to the gap between them, starting at the
//! preceding token's `end`.

use std::ops::Range;

use canonical::Token;

use crate::types::{DiffError, Side};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NormalizedView {
    chars: Vec<char>,
    origins: Vec<Range<usize>>,
}

impl NormalizedView {
    /// Validate `tokens` against `text` and build the view.
    pub(crate) fn build(tokens: &[Token], text: &str, side: Side) -> Result<Self, DiffError> {
        validate(tokens, text, side)?;

        let capacity: usize = tokens.iter().map(|t| t.text.len() + 1).sum();
        let mut chars = Vec::with_capacity(capacity);
        let mut origins = Vec::with_capacity(capacity);

        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                chars.push(' ');
                origins.push(tokens[index - 1].end..token.start);
            }
            // Normalization can change the byte length of a token, so the
            // mapping is clamped to the token's end and floored to a char
            // boundary of the original text. The last character always
            // reaches the token's end.
            let mut chars_of_token = token.text.char_indices().peekable();
            while let Some((byte, ch)) = chars_of_token.next() {
                let start = floor_char_boundary(text, (token.start + byte).min(token.end));
                let end = match chars_of_token.peek() {
                    Some((next, _)) => {
                        floor_char_boundary(text, (token.start + next).min(token.end)).max(start)
                    }
                    None => token.end,
                };
                chars.push(ch);
                origins.push(start..end);
            }
        }

        Ok(Self { chars, origins })
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Original-text offset of the view character at `index`.
    pub(crate) fn origin(&self, index: usize) -> usize {
        self.origins[index].start
    }

    /// Original-text ranges of the view characters in `range`.
    pub(crate) fn origins(&self, range: Range<usize>) -> &[Range<usize>] {
        &self.origins[range]
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }
}

fn validate(tokens: &[Token], text: &str, side: Side) -> Result<(), DiffError> {
    let malformed = |index: usize, reason: String| DiffError::MalformedInput {
        side,
        index,
        reason,
    };

    let mut previous: Option<&Token> = None;
    for (index, token) in tokens.iter().enumerate() {
        if token.start > token.end {
            return Err(malformed(
                index,
                format!("start {} is after end {}", token.start, token.end),
            ));
        }
        if token.end > text.len() {
            return Err(malformed(
                index,
                format!("end {} is out of bounds (text length {})", token.end, text.len()),
            ));
        }
        if !text.is_char_boundary(token.start) || !text.is_char_boundary(token.end) {
            return Err(malformed(
                index,
                format!(
                    "range {}..{} is not on character boundaries",
                    token.start, token.end
                ),
            ));
        }
        if let Some(prev) = previous {
            if token.start <= prev.start {
                return Err(malformed(
                    index,
                    format!(
                        "start {} does not increase (previous start {})",
                        token.start, prev.start
                    ),
                ));
            }
            if token.start < prev.end {
                return Err(malformed(
                    index,
                    format!(
                        "range {}..{} overlaps previous token ending at {}",
                        token.start, token.end, prev.end
                    ),
                ));
            }
        }
        previous = Some(token);
    }
    Ok(())
}

pub(crate) fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
