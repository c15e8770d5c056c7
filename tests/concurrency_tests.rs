//! Concurrency and thread safety tests for pagewatch

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pagewatch::{
    run_cycle, CanonicalError, CycleConfig, CycleReport, MatchOptions, Parser, ParserPool,
    PipelineError, Snapshot, Subscription, TokenizeOptions,
};

const OLD: &str = "is the of the 100-eyed giant in Greek mythology.";
const NEW: &str = "Argus Panoptes is the name of the 100-eyed giant in Norse mythology.";

fn snapshot(url: &str, text: &str, seconds: i64) -> Snapshot {
    let fetched_at = Utc
        .timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("timestamp");
    Snapshot::new(url, "text/plain", text, fetched_at)
}

fn subscriptions() -> Vec<Subscription> {
    vec![Subscription::build(
        "myth",
        ["greek", "norse", "argus panoptes"],
        &Parser::new(),
        &TokenizeOptions::default(),
        MatchOptions::default(),
    )
    .expect("subscription")]
}

#[test]
fn concurrent_cycles_share_one_pool() {
    let pool = Arc::new(ParserPool::new(2).expect("pool"));
    let subs = Arc::new(subscriptions());
    let cfg = CycleConfig {
        acquire_timeout: Duration::from_secs(30),
        ..CycleConfig::default()
    };

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pool = Arc::clone(&pool);
            let subs = Arc::clone(&subs);
            let cfg = cfg.clone();
            thread::spawn(move || {
                let url = format!("https://example.org/doc-{i}");
                run_cycle(
                    &pool,
                    &snapshot(&url, OLD, 0),
                    &snapshot(&url, NEW, 60),
                    &subs,
                    &cfg,
                )
                .expect("cycle should succeed")
            })
        })
        .collect();

    let reports: Vec<CycleReport> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread panicked"))
        .collect();

    for report in &reports {
        assert_eq!(report.spans, reports[0].spans);
        assert_eq!(report.notifications.len(), 1);
        assert_eq!(
            report.notifications[0].records,
            reports[0].notifications[0].records
        );
    }
    assert_eq!(pool.available(), 2);
}

#[test]
fn waiters_proceed_when_a_parser_is_released() {
    let pool = Arc::new(ParserPool::new(1).expect("pool"));
    let held = pool.try_acquire().expect("parser");

    let waiter = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let cfg = CycleConfig {
                acquire_timeout: Duration::from_secs(30),
                ..CycleConfig::default()
            };
            run_cycle(
                &pool,
                &snapshot("https://example.org/argus", OLD, 0),
                &snapshot("https://example.org/argus", NEW, 60),
                &[],
                &cfg,
            )
        })
    };

    thread::sleep(Duration::from_millis(20));
    drop(held);

    let report = waiter.join().expect("thread panicked").expect("cycle");
    assert_eq!(report.spans.len(), 6);
    assert_eq!(pool.available(), 1);
}

#[test]
fn short_timeouts_fail_without_leaking_parsers() {
    let pool = Arc::new(ParserPool::new(1).expect("pool"));
    let held = pool.try_acquire().expect("parser");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let cfg = CycleConfig {
                    acquire_timeout: Duration::from_millis(5),
                    ..CycleConfig::default()
                };
                run_cycle(
                    &pool,
                    &snapshot("https://example.org/argus", OLD, 0),
                    &snapshot("https://example.org/argus", NEW, 60),
                    &[],
                    &cfg,
                )
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("thread panicked");
        assert!(matches!(
            result,
            Err(PipelineError::Canonical(CanonicalError::PoolExhausted { .. }))
        ));
    }

    drop(held);
    assert_eq!(pool.available(), 1);
}

#[test]
fn engine_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();
    assert_send_sync::<ParserPool>();
    assert_send_sync::<pagewatch::Keyword>();
    assert_send_sync::<pagewatch::DiffSpan>();
    assert_send_sync::<pagewatch::Match>();
    assert_send_sync::<Subscription>();
}
