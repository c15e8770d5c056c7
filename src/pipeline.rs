//! One polling cycle: two snapshots in, notifications out.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use canonical::{CanonicalError, ParserPool, Token, TokenizeOptions, Tokenizer};
use diff::{DiffSpan, DiffSummary};
use matcher::{DifferenceMatcher, Keyword, MatchError, MatchOptions, MatchRecord, MatchSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

use crate::snapshot::{Snapshot, StoreError};
use crate::{MetricsSpan, PipelineError};

/// A subscriber's keywords and matching options for one document.
///
/// Keywords must have been built with the same [`TokenizeOptions`] the cycle
/// tokenizes snapshots with. When those options leave the language to
/// detection, every cycle rebuilds the keywords from their original input
/// under the language detected for the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub options: MatchOptions,
}

impl Subscription {
    pub fn new(id: impl Into<String>, keywords: Vec<Keyword>, options: MatchOptions) -> Self {
        Self {
            id: id.into(),
            keywords,
            options,
        }
    }

    /// Build every phrase into a [`Keyword`] with `tokenizer` and `tokenize`.
    pub fn build<I, S>(
        id: impl Into<String>,
        phrases: I,
        tokenizer: &dyn Tokenizer,
        tokenize: &TokenizeOptions,
        options: MatchOptions,
    ) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = phrases
            .into_iter()
            .map(|phrase| Keyword::build(phrase.as_ref(), tokenizer, tokenize))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(id, keywords, options))
    }
}

/// Runtime settings shared by every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleConfig {
    pub tokenize: TokenizeOptions,
    /// How long to wait for a free parser before giving up on the cycle.
    pub acquire_timeout: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            tokenize: TokenizeOptions::default(),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Matches for one subscription on one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subscription_id: String,
    pub url: String,
    pub content_type: String,
    pub records: Vec<MatchRecord>,
}

impl Notification {
    fn new(subscription: &Subscription, snapshot: &Snapshot, matches: &MatchSet) -> Self {
        Self {
            subscription_id: subscription.id.clone(),
            url: snapshot.url().to_string(),
            content_type: snapshot.content_type().to_string(),
            records: matches.iter().map(MatchRecord::from).collect(),
        }
    }
}

/// Outcome of [`run_cycle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub spans: Vec<DiffSpan>,
    pub summary: DiffSummary,
    /// Only subscriptions with at least one match get a notification.
    pub notifications: Vec<Notification>,
    /// The snapshots hashed identically and detection was skipped.
    pub content_unchanged: bool,
}

impl CycleReport {
    fn unchanged() -> Self {
        Self {
            content_unchanged: true,
            ..Self::default()
        }
    }
}

/// Compare `older` against `newer` and match every subscription against the
/// changed spans.
///
/// One parser is taken from `pool` for the whole cycle and returned on every
/// exit path. When `cfg.tokenize` leaves the language to detection, it is
/// detected once from `newer` and used for both snapshots and all keywords.
/// Snapshots with identical content hashes short-circuit to an empty report
/// without touching the pool.
///
/// # Errors
///
/// - [`PipelineError::Store`] when the snapshots belong to different documents.
/// - [`PipelineError::Canonical`] when no parser frees up within
///   `cfg.acquire_timeout`, or tokenization fails.
/// - [`PipelineError::Diff`] from the detector.
/// - [`PipelineError::Match`] when keywords cannot be rebuilt for the
///   document's detected language.
pub fn run_cycle(
    pool: &ParserPool,
    older: &Snapshot,
    newer: &Snapshot,
    subscriptions: &[Subscription],
    cfg: &CycleConfig,
) -> Result<CycleReport, PipelineError> {
    let start = Instant::now();

    if older.key() != newer.key() {
        let err = PipelineError::from(StoreError::KeyMismatch {
            expected: older.key().clone(),
            found: newer.key().clone(),
        });
        let elapsed_micros = start.elapsed().as_micros();
        warn!(error = %err, elapsed_micros, "cycle_failure");
        return Err(err);
    }

    let span = tracing::span!(
        Level::INFO,
        "pagewatch.cycle",
        url = %newer.url(),
        content_type = %newer.content_type()
    );
    let _guard = span.enter();

    match cycle_inner(pool, older, newer, subscriptions, cfg) {
        Ok(report) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                spans = report.spans.len(),
                inserted = report.summary.inserted_spans,
                deleted = report.summary.deleted_spans,
                subscriptions = subscriptions.len(),
                notifications = report.notifications.len(),
                content_unchanged = report.content_unchanged,
                elapsed_micros,
                "cycle_success"
            );
            Ok(report)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(
                subscriptions = subscriptions.len(),
                error = %err,
                elapsed_micros,
                "cycle_failure"
            );
            Err(err)
        }
    }
}

fn cycle_inner(
    pool: &ParserPool,
    older: &Snapshot,
    newer: &Snapshot,
    subscriptions: &[Subscription],
    cfg: &CycleConfig,
) -> Result<CycleReport, PipelineError> {
    if older.same_content(newer) {
        return Ok(CycleReport::unchanged());
    }

    let parser = pool.acquire(cfg.acquire_timeout)?;
    let tokenize = parser.pin_language(newer.raw_text(), &cfg.tokenize)?;
    let rebuild_keywords = tokenize != cfg.tokenize;

    let old_tokens = tokenize_recorded(&*parser, older.raw_text(), &tokenize)?;
    let new_tokens = tokenize_recorded(&*parser, newer.raw_text(), &tokenize)?;

    let detect_metrics = MetricsSpan::start();
    let spans = match diff::detect(&old_tokens, older.raw_text(), &new_tokens, newer.raw_text()) {
        Ok(spans) => {
            if let Some(span) = detect_metrics {
                span.record_detect(Ok(()));
            }
            spans
        }
        Err(err) => {
            if let Some(span) = detect_metrics {
                span.record_detect(Err(err.clone()));
            }
            return Err(PipelineError::Diff(err));
        }
    };
    let summary = DiffSummary::from_spans(&spans);

    let matcher = DifferenceMatcher::new(&*parser, &tokenize);
    let mut notifications = Vec::new();
    for subscription in subscriptions {
        let match_metrics = MetricsSpan::start();
        let found = match cycle_keywords(&*parser, subscription, &tokenize, rebuild_keywords) {
            Ok(keywords) => {
                let found = matcher.find_matches(
                    &spans,
                    &keywords,
                    &subscription.options,
                    older.raw_text(),
                    newer.raw_text(),
                );
                if let Some(span) = match_metrics {
                    span.record_match(Ok(()));
                }
                found
            }
            Err(err) => {
                if let Some(span) = match_metrics {
                    span.record_match(Err(err.clone()));
                }
                return Err(PipelineError::Match(err));
            }
        };
        if !found.is_empty() {
            notifications.push(Notification::new(subscription, newer, &found));
        }
    }

    Ok(CycleReport {
        spans,
        summary,
        notifications,
        content_unchanged: false,
    })
}

/// The subscription's keywords as they apply to this cycle: rebuilt under the
/// pinned language when it was detected, borrowed otherwise.
fn cycle_keywords<'s>(
    tokenizer: &dyn Tokenizer,
    subscription: &'s Subscription,
    options: &TokenizeOptions,
    rebuild: bool,
) -> Result<Cow<'s, [Keyword]>, MatchError> {
    if !rebuild {
        return Ok(Cow::Borrowed(&subscription.keywords));
    }
    subscription
        .keywords
        .iter()
        .map(|keyword| Keyword::build(keyword.original_input(), tokenizer, options))
        .collect::<Result<Vec<_>, _>>()
        .map(Cow::Owned)
}

fn tokenize_recorded(
    tokenizer: &dyn Tokenizer,
    text: &str,
    options: &TokenizeOptions,
) -> Result<Vec<Token>, CanonicalError> {
    let metrics = MetricsSpan::start();
    let result = tokenizer.tokenize(text, options);
    if let Some(span) = metrics {
        span.record_tokenize(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonical::Parser;
    use chrono::{TimeZone, Utc};
    use diff::DiffEvent;

    const OLD: &str = "is the of the 100-eyed giant in Greek mythology.";
    const NEW: &str = "Argus Panoptes is the name of the 100-eyed giant in Norse mythology.";

    fn snapshot(text: &str, seconds: i64) -> Snapshot {
        let fetched_at = Utc
            .timestamp_opt(1_700_000_000 + seconds, 0)
            .single()
            .expect("timestamp");
        Snapshot::new("https://example.org/argus", "text/plain", text, fetched_at)
    }

    fn subscription(id: &str, phrases: &[&str], options: MatchOptions) -> Subscription {
        Subscription::build(
            id,
            phrases,
            &Parser::new(),
            &TokenizeOptions::default(),
            options,
        )
        .expect("keywords")
    }

    #[test]
    fn cycle_reports_spans_and_notifications() {
        let pool = ParserPool::new(1).expect("pool");
        let subs = vec![
            subscription("myth", &["Greek", "Norse"], MatchOptions::default()),
            subscription("quiet", &["Roman"], MatchOptions::default()),
        ];
        let report = run_cycle(
            &pool,
            &snapshot(OLD, 0),
            &snapshot(NEW, 60),
            &subs,
            &CycleConfig::default(),
        )
        .expect("cycle");

        assert!(!report.content_unchanged);
        assert_eq!(report.spans.len(), 6);
        assert_eq!(report.summary.inserted_spans, 2);
        assert_eq!(report.summary.deleted_spans, 2);

        assert_eq!(report.notifications.len(), 1);
        let notification = &report.notifications[0];
        assert_eq!(notification.subscription_id, "myth");
        assert_eq!(notification.url, "https://example.org/argus");
        assert_eq!(notification.content_type, "text/plain");

        let found: Vec<(&str, DiffEvent, &str)> = notification
            .records
            .iter()
            .map(|r| (r.keyword.as_str(), r.event, r.text.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Greek", DiffEvent::Deleted, "greek"),
                ("Norse", DiffEvent::Inserted, "norse"),
            ]
        );
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn snippets_come_from_the_owning_snapshot() {
        let pool = ParserPool::new(1).expect("pool");
        let options = MatchOptions {
            snippet_radius: 10,
            ..MatchOptions::default()
        };
        let subs = vec![subscription("myth", &["Greek"], options)];
        let report = run_cycle(
            &pool,
            &snapshot(OLD, 0),
            &snapshot(NEW, 60),
            &subs,
            &CycleConfig::default(),
        )
        .expect("cycle");

        let record = &report.notifications[0].records[0];
        assert_eq!(record.snippet, "... giant in Greek mythology...");
    }

    #[test]
    fn identical_content_skips_detection() {
        let pool = ParserPool::new(1).expect("pool");
        let _held = pool.try_acquire().expect("parser");
        let subs = vec![subscription("myth", &["Greek"], MatchOptions::default())];

        // The only parser is checked out; the fast path must not need it.
        let report = run_cycle(
            &pool,
            &snapshot(OLD, 0),
            &snapshot(OLD, 60),
            &subs,
            &CycleConfig::default(),
        )
        .expect("cycle");
        assert!(report.content_unchanged);
        assert!(report.spans.is_empty());
        assert!(report.notifications.is_empty());
    }

    #[test]
    fn mismatched_documents_are_rejected() {
        let pool = ParserPool::new(1).expect("pool");
        let other = Snapshot::new(
            "https://example.org/argus",
            "text/html",
            NEW,
            Utc.timestamp_opt(1_700_000_060, 0).single().expect("timestamp"),
        );
        let err = run_cycle(&pool, &snapshot(OLD, 0), &other, &[], &CycleConfig::default())
            .expect_err("mismatch");
        assert!(matches!(
            err,
            PipelineError::Store(StoreError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn exhausted_pool_times_out() {
        let pool = ParserPool::new(1).expect("pool");
        let held = pool.try_acquire().expect("parser");
        let cfg = CycleConfig {
            acquire_timeout: Duration::from_millis(10),
            ..CycleConfig::default()
        };
        let err = run_cycle(&pool, &snapshot(OLD, 0), &snapshot(NEW, 60), &[], &cfg)
            .expect_err("exhausted");
        assert!(matches!(
            err,
            PipelineError::Canonical(CanonicalError::PoolExhausted { capacity: 1, .. })
        ));

        drop(held);
        assert!(run_cycle(&pool, &snapshot(OLD, 0), &snapshot(NEW, 60), &[], &cfg).is_ok());
    }

    #[test]
    fn tokenizer_failure_releases_parser() {
        let pool = ParserPool::new(1).expect("pool");
        let cfg = CycleConfig {
            tokenize: TokenizeOptions {
                filter_stopwords: true,
                ..TokenizeOptions::default()
            }
            .with_language_hint("xx"),
            ..CycleConfig::default()
        };
        let err = run_cycle(&pool, &snapshot(OLD, 0), &snapshot(NEW, 60), &[], &cfg)
            .expect_err("unsupported language");
        assert!(matches!(
            err,
            PipelineError::Canonical(CanonicalError::UnsupportedLanguage(_))
        ));
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn detected_language_applies_to_keywords() {
        let pool = ParserPool::new(1).expect("pool");
        let tokenize = TokenizeOptions {
            enable_stemming: true,
            ..TokenizeOptions::default()
        };
        let cfg = CycleConfig {
            tokenize: tokenize.clone(),
            ..CycleConfig::default()
        };
        // Built without a hint, "Häuser" alone is detected as English.
        let subs = vec![Subscription::build(
            "bau",
            ["Häuser"],
            &Parser::new(),
            &tokenize,
            MatchOptions::default(),
        )
        .expect("keywords")];

        let older = snapshot("Die Stadt ist alt und die Straßen sind leer.", 0);
        let newer = snapshot(
            "Die Stadt ist alt und die Straßen sind leer. Neue Häuser werden in der Stadt gebaut.",
            60,
        );
        let report = run_cycle(&pool, &older, &newer, &subs, &cfg).expect("cycle");

        assert_eq!(report.notifications.len(), 1);
        let record = &report.notifications[0].records[0];
        assert_eq!(record.keyword, "Häuser");
        assert_eq!(record.event, DiffEvent::Inserted);
        assert!(record.snippet.contains("Neue Häuser werden"));
    }

    #[test]
    fn notifications_serialize_as_json() {
        let pool = ParserPool::new(1).expect("pool");
        let subs = vec![subscription("myth", &["Norse"], MatchOptions::default())];
        let report = run_cycle(
            &pool,
            &snapshot(OLD, 0),
            &snapshot(NEW, 60),
            &subs,
            &CycleConfig::default(),
        )
        .expect("cycle");

        let json = serde_json::to_value(&report.notifications[0]).expect("json");
        assert_eq!(json["subscription_id"], "myth");
        assert_eq!(json["records"][0]["keyword"], "Norse");
        assert_eq!(json["records"][0]["event"], "inserted");
        assert_eq!(json["records"][0]["text"], "norse");
    }
}
