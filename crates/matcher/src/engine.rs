use std::ops::Range;
use std::time::Instant;

use canonical::{TokenizeOptions, Tokenizer};
use diff::{DiffEvent, DiffSpan};

use crate::metrics::metrics_recorder;
use crate::snippet::extract_snippet;
use crate::types::{Keyword, Match, MatchError, MatchOptions, MatchSet};


/// Scans changed spans for keyword phrases.
///
/// The matcher borrows the tokenizer and the options used for document text so
/// that keywords it builds are normalized the way span text already is. It
/// holds no other state; one instance can serve any number of calls.
pub struct DifferenceMatcher<'a> {
    tokenizer: &'a dyn Tokenizer,
    tokenize_options: &'a TokenizeOptions,
}

impl<'a> DifferenceMatcher<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, tokenize_options: &'a TokenizeOptions) -> Self {
        Self {
            tokenizer,
            tokenize_options,
        }
    }

    /// Build a keyword with this matcher's tokenizer and options.
    pub fn build_keyword(&self, input: &str) -> Result<Keyword, MatchError> {
        Keyword::build(input, self.tokenizer, self.tokenize_options)
    }

    /// Find every keyword that occurs as a contiguous token run inside a span
    /// accepted by `options.filter`.
    ///
    /// Span text is already normalized by the detector (token texts joined by
    /// single spaces), so it is split at those separators and compared as is.
    ///
    /// Snippets are cut from `old_text` for `deleted` spans and from
    /// `new_text` for `inserted` spans, around the original range of the
    /// matched tokens. Results are deduplicated on `(keyword, event, text)`;
    /// when the same key is found twice the first snippet wins.
    ///
    /// Empty keywords and empty span lists produce no matches.
    pub fn find_matches(
        &self,
        spans: &[DiffSpan],
        keywords: &[Keyword],
        options: &MatchOptions,
        old_text: &str,
        new_text: &str,
    ) -> MatchSet {
        let started = Instant::now();
        let mut matches = MatchSet::new();

        let active: Vec<&Keyword> = keywords.iter().filter(|k| !k.is_empty()).collect();
        if !active.is_empty() {
            for span in spans.iter().filter(|s| options.filter.accepts(s.event)) {
                let words = span_words(&span.text);
                if words.is_empty() {
                    continue;
                }
                let source = match span.event {
                    DiffEvent::Deleted => old_text,
                    DiffEvent::Inserted | DiffEvent::Unchanged => new_text,
                };

                for keyword in &active {
                    let Some(at) = find_phrase(&words, keyword.tokens()) else {
                        continue;
                    };
                    let first = words[at].range.start;
                    let last = words[at + keyword.tokens().len() - 1].range.end;
                    let found = span.source_range(first..last);
                    let snippet = extract_snippet(
                        source,
                        found.start,
                        found.end - found.start,
                        options.snippet_radius,
                    );
                    matches.insert(Match {
                        keyword: (*keyword).clone(),
                        event: span.event,
                        text: span.text.clone(),
                        snippet,
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        if let Some(metrics) = metrics_recorder() {
            metrics.record_match(spans.len(), keywords.len(), elapsed, matches.len());
        }
        tracing::debug!(
            spans = spans.len(),
            keywords = keywords.len(),
            matches = matches.len(),
            elapsed_micros = elapsed.as_micros(),
            "keywords_matched"
        );

        matches
    }
}

/// A word of a span's normalized text with its byte range in that text.
struct SpanWord<'t> {
    text: &'t str,
    range: Range<usize>,
}

/// Split normalized span text at its single-space separators.
fn span_words(text: &str) -> Vec<SpanWord<'_>> {
    let mut words = Vec::new();
    let mut start = 0;
    for piece in text.split(' ') {
        if !piece.is_empty() {
            words.push(SpanWord {
                text: piece,
                range: start..start + piece.len(),
            });
        }
        start += piece.len() + 1;
    }
    words
}

/// Index of the first window of `words` whose texts equal `phrase`.
fn find_phrase(words: &[SpanWord<'_>], phrase: &[String]) -> Option<usize> {
    if phrase.is_empty() || phrase.len() > words.len() {
        return None;
    }
    words.windows(phrase.len()).position(|window| {
        window
            .iter()
            .zip(phrase)
            .all(|(word, token)| word.text == token.as_str())
    })
}
