use std::ops::ControlFlow;

use power_usage_domain::domain::{MomentaryReading, PeriodicReading, Snapshot};
use time::PrimitiveDateTime;

use super::rows::{FeedRow, PeriodicRow};

/// Folds classified rows into a [`Snapshot`], carrying capacity and forecast
/// peak forward to every reading parsed after them.
///
/// Capacity is last-wins; the forecast peak is kept from the first non-zero
/// forecast row.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    feed_timestamp: Option<PrimitiveDateTime>,
    capacity: u32,
    forecast_peak_usage: u32,
    forecast_peak_period: u8,
    momentary: MomentaryReading,
    periodic: Vec<PeriodicReading>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Break` when the row marks the end of usable data.
    pub fn apply(&mut self, row: FeedRow) -> ControlFlow<()> {
        match row {
            FeedRow::Header(ts) => self.feed_timestamp = Some(ts),
            FeedRow::Capacity(capacity) => self.capacity = capacity,
            FeedRow::ForecastPeak { usage, period } => {
                if self.forecast_peak_usage == 0 {
                    self.forecast_peak_usage = usage;
                    self.forecast_peak_period = period;
                }
            }
            FeedRow::Periodic(row) => {
                let reading = self.periodic_reading(row);
                self.periodic.push(reading);
            }
            FeedRow::Momentary { usage: None, .. } => return ControlFlow::Break(()),
            FeedRow::Momentary {
                updated_at,
                usage: Some(usage),
            } => {
                self.momentary = MomentaryReading {
                    usage,
                    updated_at,
                    capacity: self.capacity,
                    forecast_peak_usage: self.forecast_peak_usage,
                    forecast_peak_period: self.forecast_peak_period,
                };
            }
        }
        ControlFlow::Continue(())
    }

    fn periodic_reading(&self, row: PeriodicRow) -> PeriodicReading {
        let (usage, forecast_usage) = if row.actual_usage > 0 {
            (Some(row.actual_usage), None)
        } else {
            (None, Some(row.forecast_usage))
        };

        PeriodicReading {
            year: row.timestamp.year(),
            month: u8::from(row.timestamp.month()),
            day: row.timestamp.day(),
            hour: row.timestamp.hour(),
            capacity: self.capacity,
            usage,
            forecast_usage,
            forecast_peak_usage: self.forecast_peak_usage,
            forecast_peak_period: self.forecast_peak_period,
            percentage: row.percentage,
            feed_updated_at: self.feed_timestamp,
        }
    }

    pub fn finish(self) -> Snapshot {
        Snapshot {
            feed_timestamp: self.feed_timestamp,
            momentary: self.momentary,
            periodic: self.periodic,
        }
    }
}
