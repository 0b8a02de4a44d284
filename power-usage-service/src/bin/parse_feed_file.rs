use anyhow::{bail, Result};
use power_usage_service::{
    observability,
    pipeline::{Pipeline, PublishOutcome},
    sinks::SnapshotPublisher,
    sources::FeedFileSource,
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: parse_feed_file <feed_csv_path>");
    }
    let file_path = &args[1];

    let publisher = SnapshotPublisher::new();
    let pipeline = Pipeline {
        source: FeedFileSource::new(file_path),
        sink: publisher.clone(),
    };

    if pipeline.run_once().await? == PublishOutcome::Retained {
        bail!("no feed timestamp found in {file_path}");
    }

    let Some(snapshot) = publisher.latest() else {
        bail!("snapshot was not published");
    };
    println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);

    Ok(())
}
