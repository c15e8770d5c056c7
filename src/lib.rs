//! Workspace umbrella crate for pagewatch.
//!
//! This crate stitches the tokenizer (`canonical`), the difference detector
//! (`diff`) and the keyword matcher (`matcher`) into a polling cycle: two
//! snapshots of one document go in, notification records for every
//! subscription whose keywords appear in the changed content come out.
//!
//! Around the engine sit an in-memory two-slot [`SnapshotStore`], a
//! [`ReaderRegistry`] for turning fetched bodies into text, [`run_cycle`] to
//! drive one comparison, and a [`Monitor`] that owns all of it and applies a
//! bounded-retry policy per document. Settings come from a YAML
//! [`WatchConfig`].

pub mod config;
pub mod logging;
pub mod monitor;
pub mod pipeline;
pub mod reader;
pub mod snapshot;

pub use canonical::{
    CanonicalError, Language, LanguageRegistry, Parser, ParserPool, PooledParser, Token,
    TokenizeOptions, Tokenizer, hash_text, tokenize,
};
pub use diff::{DiffError, DiffEvent, DiffSpan, DiffSummary, Side, detect};
pub use matcher::{
    DifferenceMatcher, Keyword, Match, MatchError, MatchFilter, MatchOptions, MatchRecord,
    MatchSet,
};

pub use crate::config::{ConfigLoadError, WatchConfig};
pub use crate::monitor::{Monitor, MonitorPolicy, Observation};
pub use crate::pipeline::{CycleConfig, CycleReport, Notification, Subscription, run_cycle};
pub use crate::reader::{HtmlReader, PlainTextReader, Reader, ReaderError, ReaderRegistry};
pub use crate::snapshot::{Snapshot, SnapshotKey, SnapshotPair, SnapshotStore, StoreError};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Errors that can occur while running a detection cycle.
#[derive(Debug)]
pub enum PipelineError {
    Canonical(CanonicalError),
    Diff(DiffError),
    Match(MatchError),
    Reader(ReaderError),
    Store(StoreError),
    Config(ConfigLoadError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Canonical(err) => write!(f, "tokenizer failure: {err}"),
            PipelineError::Diff(err) => write!(f, "difference detection failed: {err}"),
            PipelineError::Match(err) => write!(f, "keyword matching failed: {err}"),
            PipelineError::Reader(err) => write!(f, "text extraction failed: {err}"),
            PipelineError::Store(err) => write!(f, "snapshot store rejected input: {err}"),
            PipelineError::Config(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Canonical(err) => Some(err),
            PipelineError::Diff(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::Reader(err) => Some(err),
            PipelineError::Store(err) => Some(err),
            PipelineError::Config(err) => Some(err),
        }
    }
}

impl From<CanonicalError> for PipelineError {
    fn from(value: CanonicalError) -> Self {
        PipelineError::Canonical(value)
    }
}

impl From<DiffError> for PipelineError {
    fn from(value: DiffError) -> Self {
        PipelineError::Diff(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<ReaderError> for PipelineError {
    fn from(value: ReaderError) -> Self {
        PipelineError::Reader(value)
    }
}

impl From<StoreError> for PipelineError {
    fn from(value: StoreError) -> Self {
        PipelineError::Store(value)
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value)
    }
}

/// Metrics observer for cycle stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_tokenize(&self, latency: Duration, result: Result<(), CanonicalError>);
    fn record_detect(&self, latency: Duration, result: Result<(), DiffError>);
    fn record_match(&self, latency: Duration, result: Result<(), MatchError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_tokenize(self, result: Result<(), CanonicalError>) {
        self.recorder.record_tokenize(self.start.elapsed(), result);
    }

    pub(crate) fn record_detect(self, result: Result<(), DiffError>) {
        self.recorder.record_detect(self.start.elapsed(), result);
    }

    pub(crate) fn record_match(self, result: Result<(), MatchError>) {
        self.recorder.record_match(self.start.elapsed(), result);
    }
}
