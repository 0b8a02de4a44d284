use std::sync::Arc;

use power_usage_domain::domain::{feed_time::format_feed_timestamp, Snapshot};
use tokio::sync::watch;

use crate::pipeline::{Envelope, PublishOutcome, Sink};

/// Holds the live snapshot. Publication is a single atomic replace; readers
/// always see either the previous snapshot or the new one in full.
#[derive(Clone)]
pub struct SnapshotPublisher {
    tx: Arc<watch::Sender<Option<Arc<Snapshot>>>>,
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }

    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }
}

impl Sink<Snapshot> for SnapshotPublisher {
    fn publish(&self, input: Envelope<Snapshot>) -> PublishOutcome {
        if !input.payload.is_publishable() {
            tracing::warn!("no feed timestamp found, keeping previous snapshot");
            metrics::counter!("snapshot_retained_total").increment(1);
            return PublishOutcome::Retained;
        }

        let feed_timestamp = input.payload.feed_timestamp.map(format_feed_timestamp);
        let periodic = input.payload.periodic.len();
        self.tx.send_replace(Some(Arc::new(input.payload)));

        metrics::counter!("snapshot_published_total").increment(1);
        if let Ok(age) = std::time::SystemTime::now().duration_since(input.received_at) {
            metrics::histogram!("snapshot_publish_latency_seconds").record(age.as_secs_f64());
        }
        tracing::info!(
            feed_timestamp = feed_timestamp.as_deref().unwrap_or_default(),
            periodic,
            "snapshot published"
        );

        PublishOutcome::Published
    }
}

/// Read-only handle on the live snapshot.
#[derive(Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Option<Arc<Snapshot>>>,
}

impl SnapshotReader {
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.rx.borrow().clone()
    }

    /// Wait for the next publication. `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
