pub mod snapshot_publisher;

pub use snapshot_publisher::{SnapshotPublisher, SnapshotReader};
