use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a run of content between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffEvent {
    /// Present only in the newer snapshot.
    Inserted,
    /// Present only in the older snapshot.
    Deleted,
    /// Present in both.
    Unchanged,
}

impl DiffEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffEvent::Inserted => "inserted",
            DiffEvent::Deleted => "deleted",
            DiffEvent::Unchanged => "unchanged",
        }
    }

    /// Which snapshot a span with this event is anchored in.
    pub fn side(self) -> Side {
        match self {
            DiffEvent::Inserted => Side::New,
            DiffEvent::Deleted | DiffEvent::Unchanged => Side::Old,
        }
    }
}

impl fmt::Display for DiffEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two snapshots of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// A maximal run of content sharing one [`DiffEvent`].
///
/// `text` is taken from the normalized view (token texts joined by single
/// spaces). `offset` is a byte offset into the original text of the snapshot
/// named by [`DiffEvent::side`]: the old snapshot for `deleted` and
/// `unchanged`, the new one for `inserted`.
///
/// Spans produced by [`detect`](crate::detect) also carry, for every character
/// of `text`, the byte range of the owning snapshot it was normalized from.
/// Those anchors are not part of the span's identity and are not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffSpan {
    pub event: DiffEvent,
    pub text: String,
    pub offset: usize,
    #[serde(skip)]
    anchors: Vec<Range<usize>>,
}

impl DiffSpan {
    /// A span whose text is assumed to be a verbatim slice of the owning
    /// snapshot starting at `offset`.
    pub fn new(event: DiffEvent, text: impl Into<String>, offset: usize) -> Self {
        Self {
            event,
            text: text.into(),
            offset,
            anchors: Vec::new(),
        }
    }

    pub(crate) fn anchored(
        event: DiffEvent,
        text: String,
        offset: usize,
        anchors: Vec<Range<usize>>,
    ) -> Self {
        Self {
            event,
            text,
            offset,
            anchors,
        }
    }

    pub(crate) fn extend(&mut self, text: impl IntoIterator<Item = char>, anchors: &[Range<usize>]) {
        self.text.extend(text);
        self.anchors.extend_from_slice(anchors);
    }

    /// Byte range in the owning snapshot that the `text[within]` slice was
    /// normalized from.
    ///
    /// `within` is a byte range of `text`. Spans without anchors (built with
    /// [`DiffSpan::new`] or deserialized) map it by shifting with `offset`.
    pub fn source_range(&self, within: Range<usize>) -> Range<usize> {
        let shifted = self.offset + within.start..self.offset + within.end;
        if within.is_empty() || self.anchors.is_empty() {
            return shifted;
        }
        let (Some(before), Some(inside)) = (
            self.text.get(..within.start),
            self.text.get(within.clone()),
        ) else {
            return shifted;
        };
        let first = before.chars().count();
        let last = first + inside.chars().count() - 1;
        match (self.anchors.get(first), self.anchors.get(last)) {
            (Some(head), Some(tail)) => head.start..tail.end.max(head.start),
            _ => shifted,
        }
    }
}

impl PartialEq for DiffSpan {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && self.text == other.text && self.offset == other.offset
    }
}

impl Eq for DiffSpan {}

impl Hash for DiffSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event.hash(state);
        self.text.hash(state);
        self.offset.hash(state);
    }
}

/// Span and character counts per event, for logs and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub inserted_spans: usize,
    pub deleted_spans: usize,
    pub unchanged_spans: usize,
    pub inserted_chars: usize,
    pub deleted_chars: usize,
    pub unchanged_chars: usize,
}

impl DiffSummary {
    pub fn from_spans(spans: &[DiffSpan]) -> Self {
        let mut summary = Self::default();
        for span in spans {
            let chars = span.text.chars().count();
            match span.event {
                DiffEvent::Inserted => {
                    summary.inserted_spans += 1;
                    summary.inserted_chars += chars;
                }
                DiffEvent::Deleted => {
                    summary.deleted_spans += 1;
                    summary.deleted_chars += chars;
                }
                DiffEvent::Unchanged => {
                    summary.unchanged_spans += 1;
                    summary.unchanged_chars += chars;
                }
            }
        }
        summary
    }

    /// `true` when at least one span is inserted or deleted.
    pub fn has_changes(&self) -> bool {
        self.inserted_spans + self.deleted_spans > 0
    }
}

/// Errors raised by [`detect`](crate::detect).
///
/// Only contract violations by the caller are errors; degenerate input such as
/// empty token streams is handled normally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("malformed {side} token stream at index {index}: {reason}")]
    MalformedInput {
        side: Side,
        index: usize,
        reason: String,
    },
}
