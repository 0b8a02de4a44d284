use time::PrimitiveDateTime;

use super::{MomentaryReading, PeriodicReading};

/// Complete result of one feed run.
///
/// A snapshot without `feed_timestamp` is never published; consumers only see
/// snapshots that carried a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct Snapshot {
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::domain::feed_time::serialize_opt"))]
    pub feed_timestamp: Option<PrimitiveDateTime>,
    pub momentary: MomentaryReading,
    pub periodic: Vec<PeriodicReading>,
}

impl Snapshot {
    pub fn is_publishable(&self) -> bool {
        self.feed_timestamp.is_some()
    }
}
