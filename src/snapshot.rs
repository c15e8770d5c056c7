//! Snapshots and the two-slot snapshot store.
//!
//! A document is identified by `(url, content_type)`. The store keeps the two
//! most recent snapshots per document, ordered by fetch time; anything older
//! is handed back to the caller as evicted.

use std::collections::HashMap;
use std::fmt;

use canonical::hash_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a monitored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub url: String,
    pub content_type: String,
}

impl SnapshotKey {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.content_type)
    }
}

/// One fetched-and-read version of a document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    key: SnapshotKey,
    raw_text: String,
    fetched_at: DateTime<Utc>,
    content_hash: String,
}

impl Snapshot {
    pub fn new(
        url: impl Into<String>,
        content_type: impl Into<String>,
        raw_text: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let raw_text = raw_text.into();
        let content_hash = hash_text(&raw_text);
        Self {
            key: SnapshotKey::new(url, content_type),
            raw_text,
            fetched_at,
            content_hash,
        }
    }

    pub fn key(&self) -> &SnapshotKey {
        &self.key
    }

    pub fn url(&self) -> &str {
        &self.key.url
    }

    pub fn content_type(&self) -> &str {
        &self.key.content_type
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// SHA-256 hex digest of the raw text.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn same_content(&self, other: &Snapshot) -> bool {
        self.content_hash == other.content_hash
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("snapshot for {found} cannot be stored under {expected}")]
    KeyMismatch {
        expected: SnapshotKey,
        found: SnapshotKey,
    },
}

/// The retained history of one document: the newest snapshot and, once a
/// second one has arrived, the one before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    older: Option<Snapshot>,
    newer: Snapshot,
}

impl SnapshotPair {
    pub fn new(first: Snapshot) -> Self {
        Self {
            older: None,
            newer: first,
        }
    }

    pub fn older(&self) -> Option<&Snapshot> {
        self.older.as_ref()
    }

    pub fn newer(&self) -> &Snapshot {
        &self.newer
    }

    pub fn key(&self) -> &SnapshotKey {
        self.newer.key()
    }

    /// Slot `snapshot` in by fetch time and return whatever fell out.
    ///
    /// A snapshot older than both retained ones is returned unchanged. Equal
    /// fetch times favour the later arrival.
    pub fn push(&mut self, snapshot: Snapshot) -> Result<Option<Snapshot>, StoreError> {
        if snapshot.key() != self.key() {
            return Err(StoreError::KeyMismatch {
                expected: self.key().clone(),
                found: snapshot.key().clone(),
            });
        }

        if snapshot.fetched_at >= self.newer.fetched_at {
            let previous = std::mem::replace(&mut self.newer, snapshot);
            return Ok(self.older.replace(previous));
        }
        match &self.older {
            Some(older) if snapshot.fetched_at < older.fetched_at => Ok(Some(snapshot)),
            _ => Ok(self.older.replace(snapshot)),
        }
    }
}

/// In-memory store holding at most two snapshots per document.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    documents: HashMap<SnapshotKey, SnapshotPair>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot and return the one it evicted, if any.
    pub fn record(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        match self.documents.get_mut(snapshot.key()) {
            // Keys always agree here; the pair was found under this key.
            Some(pair) => pair.push(snapshot).unwrap_or(None),
            None => {
                self.documents
                    .insert(snapshot.key().clone(), SnapshotPair::new(snapshot));
                None
            }
        }
    }

    pub fn get(&self, key: &SnapshotKey) -> Option<&SnapshotPair> {
        self.documents.get(key)
    }

    pub fn latest(&self, key: &SnapshotKey) -> Option<&Snapshot> {
        self.documents.get(key).map(SnapshotPair::newer)
    }

    pub fn remove(&mut self, key: &SnapshotKey) -> Option<SnapshotPair> {
        self.documents.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SnapshotKey> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("timestamp") + Duration::seconds(seconds)
    }

    fn snap(text: &str, seconds: i64) -> Snapshot {
        Snapshot::new("https://example.org/argus", "text/plain", text, at(seconds))
    }

    #[test]
    fn hash_tracks_content() {
        let a = snap("same", 0);
        let b = snap("same", 10);
        let c = snap("different", 20);
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
        assert_eq!(a.content_hash(), hash_text("same"));
    }

    #[test]
    fn keeps_two_most_recent() {
        let mut store = SnapshotStore::new();
        assert!(store.record(snap("v1", 0)).is_none());
        assert!(store.record(snap("v2", 10)).is_none());
        let evicted = store.record(snap("v3", 20)).expect("v1 evicted");
        assert_eq!(evicted.raw_text(), "v1");

        let pair = store.get(snap("x", 0).key()).expect("pair");
        assert_eq!(pair.older().map(Snapshot::raw_text), Some("v2"));
        assert_eq!(pair.newer().raw_text(), "v3");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn late_arrivals_slot_by_fetch_time() {
        let mut pair = SnapshotPair::new(snap("v3", 30));
        assert!(pair.push(snap("v1", 10)).expect("push").is_none());
        assert_eq!(pair.older().map(Snapshot::raw_text), Some("v1"));

        // Between the two: replaces the older slot.
        let evicted = pair.push(snap("v2", 20)).expect("push").expect("evicted");
        assert_eq!(evicted.raw_text(), "v1");
        assert_eq!(pair.newer().raw_text(), "v3");

        // Older than both: bounced straight back.
        let bounced = pair.push(snap("v0", 0)).expect("push").expect("bounced");
        assert_eq!(bounced.raw_text(), "v0");
        assert_eq!(pair.older().map(Snapshot::raw_text), Some("v2"));
    }

    #[test]
    fn pair_rejects_other_documents() {
        let mut pair = SnapshotPair::new(snap("v1", 0));
        let other = Snapshot::new("https://example.org/argus", "text/html", "v2", at(1));
        let err = pair.push(other).expect_err("key mismatch");
        assert!(matches!(err, StoreError::KeyMismatch { .. }));
        assert_eq!(pair.newer().raw_text(), "v1");
    }

    #[test]
    fn documents_are_independent() {
        let mut store = SnapshotStore::new();
        store.record(snap("plain", 0));
        store.record(Snapshot::new(
            "https://example.org/argus",
            "text/html",
            "<p>html</p>",
            at(0),
        ));
        assert_eq!(store.len(), 2);
        let removed = store
            .remove(&SnapshotKey::new("https://example.org/argus", "text/html"))
            .expect("removed");
        assert_eq!(removed.newer().raw_text(), "<p>html</p>");
        assert_eq!(store.keys().count(), 1);
    }
}
