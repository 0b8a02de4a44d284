/// The latest instantaneous usage sample, kept apart from the periodic series.
///
/// `capacity` and the forecast-peak fields are the values in effect when the
/// row was parsed. A snapshot whose feed had no momentary rows carries the
/// default (all zero, empty `updated_at`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct MomentaryReading {
    pub usage: u32,
    /// Raw `date time` text from the row, e.g. `2011/7/5 13:05`.
    pub updated_at: String,
    pub capacity: u32,
    pub forecast_peak_usage: u32,
    pub forecast_peak_period: u8,
}
