use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use canonical::{CanonicalError, TokenizeOptions, Tokenizer};
use diff::DiffEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A subscriber phrase, normalized the same way document text is.
///
/// Build it once per subscription with [`Keyword::build`] and reuse it across
/// cycles. A keyword whose phrase normalizes to nothing (only stopwords or
/// punctuation) is valid but never matches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Keyword {
    original_input: String,
    tokens: Vec<String>,
}

impl Keyword {
    /// Tokenize `input` with the same tokenizer and options used for
    /// document text.
    pub fn build(
        input: &str,
        tokenizer: &dyn Tokenizer,
        options: &TokenizeOptions,
    ) -> Result<Self, MatchError> {
        let tokens = tokenizer
            .tokenize(input, options)?
            .into_iter()
            .map(|token| token.text)
            .collect();
        Ok(Self {
            original_input: input.to_string(),
            tokens,
        })
    }

    /// Construct from an already-normalized token sequence.
    pub fn from_tokens<I, S>(input: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            original_input: input.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A keyword found inside a changed span.
///
/// Identity (equality, ordering, hashing) is `(keyword, event, text)`. The
/// snippet is carried along for display but two matches that differ only in
/// snippet are the same match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub keyword: Keyword,
    pub event: DiffEvent,
    pub text: String,
    pub snippet: String,
}

impl Match {
    fn key(&self) -> (&Keyword, DiffEvent, &str) {
        (&self.keyword, self.event, &self.text)
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Match {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Deduplicated, deterministically ordered match results.
pub type MatchSet = BTreeSet<Match>;

/// One notification line per match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub keyword: String,
    pub event: DiffEvent,
    pub text: String,
    pub snippet: String,
}

impl From<&Match> for MatchRecord {
    fn from(m: &Match) -> Self {
        Self {
            keyword: m.keyword.original_input().to_string(),
            event: m.event,
            text: m.text.clone(),
            snippet: m.snippet.clone(),
        }
    }
}

/// Which change events a subscriber cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(default)]
    pub ignore_inserted: bool,
    #[serde(default)]
    pub ignore_deleted: bool,
}

impl MatchFilter {
    /// `unchanged` spans are never accepted.
    pub fn accepts(&self, event: DiffEvent) -> bool {
        match event {
            DiffEvent::Inserted => !self.ignore_inserted,
            DiffEvent::Deleted => !self.ignore_deleted,
            DiffEvent::Unchanged => false,
        }
    }
}

/// Per-subscription matching knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(flatten)]
    pub filter: MatchFilter,
    /// Characters of context on each side of a match.
    #[serde(default = "MatchOptions::default_snippet_radius")]
    pub snippet_radius: usize,
}

impl MatchOptions {
    pub(crate) fn default_snippet_radius() -> usize {
        50
    }

    pub fn with_filter(mut self, filter: MatchFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            filter: MatchFilter::default(),
            snippet_radius: Self::default_snippet_radius(),
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("tokenization failed: {0}")]
    Tokenize(#[from] CanonicalError),
}
