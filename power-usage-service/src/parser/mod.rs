//! Single-pass parser for the power usage feed.

pub mod aggregate;
pub mod rows;

use power_usage_domain::domain::Snapshot;

pub use aggregate::SnapshotBuilder;
pub use rows::{classify, FeedRow};

/// Parse decoded feed text into a snapshot.
///
/// Lines that fit no known row shape are skipped. An empty momentary usage
/// field ends the scan; nothing after it is read.
pub fn parse(text: &str) -> Snapshot {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut builder = SnapshotBuilder::new();
    let mut classified: u64 = 0;
    let mut skipped: u64 = 0;
    let mut stopped_early = false;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable feed line skipped");
                skipped += 1;
                continue;
            }
        };

        let Some(row) = classify(&record) else {
            skipped += 1;
            continue;
        };
        classified += 1;
        if builder.apply(row).is_break() {
            stopped_early = true;
            break;
        }
    }

    metrics::counter!("feed_lines_skipped_total").increment(skipped);

    let snapshot = builder.finish();
    tracing::debug!(
        classified,
        skipped,
        stopped_early,
        periodic = snapshot.periodic.len(),
        has_timestamp = snapshot.feed_timestamp.is_some(),
        "feed parsed"
    );
    snapshot
}
