pub mod feed_time;
pub mod momentary_reading;
pub mod periodic_reading;
pub mod snapshot;

pub use momentary_reading::MomentaryReading;
pub use periodic_reading::PeriodicReading;
pub use snapshot::Snapshot;
