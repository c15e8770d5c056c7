use chrono::{TimeZone, Utc};
use pagewatch::{
    detect, run_cycle, tokenize, CycleConfig, CycleReport, DiffEvent, MatchOptions, Parser,
    ParserPool, Snapshot, Subscription, TokenizeOptions,
};

const OLD: &str = "Argus watched Io for Hera. Hermes, sent by Zeus, lulled him to sleep.";
const NEW: &str = "Argus guarded Io for Hera until Hermes, sent by Zeus, slew him in his sleep.";

fn snapshot(text: &str, seconds: i64) -> Snapshot {
    let fetched_at = Utc
        .timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("timestamp");
    Snapshot::new("https://example.org/io", "text/plain", text, fetched_at)
}

fn cycle_once(pool_size: usize) -> CycleReport {
    let pool = ParserPool::new(pool_size).expect("pool");
    let subscription = Subscription::build(
        "myth",
        ["hermes", "sleep", "argus", "slew him"],
        &Parser::new(),
        &TokenizeOptions::default(),
        MatchOptions::default(),
    )
    .expect("subscription");
    run_cycle(
        &pool,
        &snapshot(OLD, 0),
        &snapshot(NEW, 60),
        &[subscription],
        &CycleConfig::default(),
    )
    .expect("cycle")
}

#[test]
fn repeated_cycles_are_identical() {
    let first = cycle_once(1);
    for pool_size in [1, 2, 4] {
        assert_eq!(cycle_once(pool_size), first);
    }

    let json_a = serde_json::to_string(&first).expect("json");
    let json_b = serde_json::to_string(&cycle_once(3)).expect("json");
    assert_eq!(json_a, json_b);
}

#[test]
fn spans_rebuild_both_normalized_views() {
    let options = TokenizeOptions::default();
    let old_tokens = tokenize(OLD, &options).expect("tokenize");
    let new_tokens = tokenize(NEW, &options).expect("tokenize");
    let spans = detect(&old_tokens, OLD, &new_tokens, NEW).expect("detect");

    let join = |tokens: &[pagewatch::Token]| {
        tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let rebuild = |skip: DiffEvent| {
        spans
            .iter()
            .filter(|span| span.event != skip)
            .map(|span| span.text.as_str())
            .collect::<String>()
    };
    assert_eq!(rebuild(DiffEvent::Inserted), join(&old_tokens));
    assert_eq!(rebuild(DiffEvent::Deleted), join(&new_tokens));
}

#[test]
fn comparing_a_snapshot_with_itself_changes_nothing() {
    let options = TokenizeOptions::default();
    let tokens = tokenize(NEW, &options).expect("tokenize");
    let spans = detect(&tokens, NEW, &tokens, NEW).expect("detect");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].event, DiffEvent::Unchanged);
    assert_eq!(spans[0].offset, 0);
}

#[test]
fn formatting_only_edits_are_unchanged_content() {
    let pool = ParserPool::new(1).expect("pool");
    let reflowed = "ARGUS   watched Io\nfor Hera -- Hermes (sent by Zeus) lulled him to sleep!";
    let report = run_cycle(
        &pool,
        &snapshot(OLD, 0),
        &snapshot(reflowed, 60),
        &[],
        &CycleConfig::default(),
    )
    .expect("cycle");

    // Different bytes, so the hash shortcut does not apply.
    assert!(!report.content_unchanged);
    assert!(!report.summary.has_changes());
    assert_eq!(report.spans.len(), 1);
}
