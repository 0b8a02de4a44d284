use time::PrimitiveDateTime;

/// One dated, hourly row of the feed's usage series.
///
/// Exactly one of `usage` / `forecast_usage` is set: `usage` when the feed
/// reported a positive actual value, otherwise the forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct PeriodicReading {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub capacity: u32,
    pub usage: Option<u32>,
    pub forecast_usage: Option<u32>,
    pub forecast_peak_usage: u32,
    pub forecast_peak_period: u8,
    pub percentage: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::domain::feed_time::serialize_opt"))]
    pub feed_updated_at: Option<PrimitiveDateTime>,
}

impl PeriodicReading {
    /// Actual usage when positive, the forecast otherwise.
    pub fn effective_usage(&self) -> u32 {
        if self.is_forecast() {
            self.forecast_usage.unwrap_or(0)
        } else {
            self.usage.unwrap_or(0)
        }
    }

    pub fn is_forecast(&self) -> bool {
        !matches!(self.usage, Some(usage) if usage > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(usage: Option<u32>, forecast_usage: Option<u32>) -> PeriodicReading {
        PeriodicReading {
            year: 2011,
            month: 7,
            day: 5,
            hour: 14,
            capacity: 2780,
            usage,
            forecast_usage,
            forecast_peak_usage: 2500,
            forecast_peak_period: 14,
            percentage: 85,
            feed_updated_at: None,
        }
    }

    #[test]
    fn actual_usage_wins_when_positive() {
        let r = reading(Some(2100), None);
        assert_eq!(r.effective_usage(), 2100);
        assert!(!r.is_forecast());
    }

    #[test]
    fn forecast_used_when_actual_missing() {
        let r = reading(None, Some(2300));
        assert_eq!(r.effective_usage(), 2300);
        assert!(r.is_forecast());
    }
}
