use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use pagewatch::{
    logging, run_cycle, ParserPool, ReaderRegistry, Snapshot, Subscription, WatchConfig,
};

const USAGE: &str = "usage: pagewatch <config.yaml> <old-file> <new-file> <keyword>...";

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let [config_path, old_path, new_path, phrases @ ..] = args.as_slice() else {
        return Err(USAGE.into());
    };
    if phrases.is_empty() {
        return Err(USAGE.into());
    }

    let config = WatchConfig::from_file(config_path)?;
    logging::init(&config.logging);

    let readers = ReaderRegistry::standard();
    let url = format!("file://{new_path}");
    let older = load_snapshot(&readers, &url, Path::new(old_path))?;
    let newer = load_snapshot(&readers, &url, Path::new(new_path))?;

    let cycle = config.cycle_config();
    let pool = ParserPool::new(config.pool.size)?;
    let subscription = {
        let parser = pool.acquire(cycle.acquire_timeout)?;
        Subscription::build(
            "cli",
            phrases,
            &*parser,
            &cycle.tokenize,
            config.matcher.to_options(),
        )?
    };

    let report = run_cycle(&pool, &older, &newer, &[subscription], &cycle)?;
    for notification in &report.notifications {
        for record in &notification.records {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}

/// Read `path` through the reader for its extension. Both sides of a
/// comparison share `url` so they land on the same document key.
fn load_snapshot(
    readers: &ReaderRegistry,
    url: &str,
    path: &Path,
) -> Result<Snapshot, Box<dyn Error>> {
    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html",
        _ => "text/plain",
    };
    let body = fs::read_to_string(path)?;
    let text = readers.read(content_type, &body)?;
    let fetched_at: DateTime<Utc> = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());
    Ok(Snapshot::new(url, content_type, text, fetched_at))
}
