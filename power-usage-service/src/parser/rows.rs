//! Row shapes recognised in the feed.
//!
//! Each line is a comma-separated record; a shape matches only when the whole
//! record fits it. Shapes overlap textually (a forecast row is a prefix of a
//! capacity row), so [`classify`] tries them in a fixed order.

use csv::StringRecord;
use power_usage_domain::domain::feed_time::parse_feed_timestamp;
use time::PrimitiveDateTime;

const HEADER_SUFFIX: &str = " UPDATE";
const HEADER_FIELDS: usize = 4;
/// capacity, time band, update date, update time, then the hourly supply plan.
const CAPACITY_FIELDS: usize = 18;
const FORECAST_FIELDS: usize = 4;
const PERIODIC_FIELDS: usize = 6;
const MOMENTARY_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRow {
    /// `<yyyy/M/d H:m> UPDATE,,,`
    Header(PrimitiveDateTime),
    Capacity(u32),
    ForecastPeak { usage: u32, period: u8 },
    Periodic(PeriodicRow),
    /// `usage` is `None` when the field is empty, which ends the usable data.
    Momentary { updated_at: String, usage: Option<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicRow {
    pub timestamp: PrimitiveDateTime,
    pub actual_usage: u32,
    pub forecast_usage: u32,
    pub percentage: u32,
}

/// Match `record` against each row shape in priority order.
pub fn classify(record: &StringRecord) -> Option<FeedRow> {
    header(record)
        .or_else(|| capacity(record))
        .or_else(|| forecast_peak(record))
        .or_else(|| periodic(record))
        .or_else(|| momentary(record))
}

fn header(record: &StringRecord) -> Option<FeedRow> {
    if record.len() != HEADER_FIELDS || !record.iter().skip(1).all(str::is_empty) {
        return None;
    }
    let stamp = record.get(0)?.strip_suffix(HEADER_SUFFIX)?;
    parse_feed_timestamp(stamp).map(FeedRow::Header)
}

fn capacity(record: &StringRecord) -> Option<FeedRow> {
    if record.len() != CAPACITY_FIELDS {
        return None;
    }
    let value = count(record.get(0)?)?;
    time_band_start(record.get(1)?)?;
    if !is_month_day(record.get(2)?) || !is_clock(record.get(3)?) {
        return None;
    }
    if !record.iter().skip(4).all(|f| count(f).is_some()) {
        return None;
    }
    Some(FeedRow::Capacity(value))
}

fn forecast_peak(record: &StringRecord) -> Option<FeedRow> {
    if record.len() != FORECAST_FIELDS {
        return None;
    }
    let usage = count(record.get(0)?)?;
    let period = time_band_start(record.get(1)?)?;
    if !is_month_day(record.get(2)?) || !is_clock(record.get(3)?) {
        return None;
    }
    Some(FeedRow::ForecastPeak { usage, period })
}

fn periodic(record: &StringRecord) -> Option<FeedRow> {
    if record.len() != PERIODIC_FIELDS {
        return None;
    }
    let (date, clock) = (record.get(0)?, record.get(1)?);
    if !is_feed_date(date) || !is_clock(clock) {
        return None;
    }
    let timestamp = parse_feed_timestamp(&format!("{date} {clock}"))?;
    let actual_usage = count(record.get(2)?)?;
    let forecast_usage = count(record.get(3)?)?;
    // Column 4 is not used by the snapshot but must still be numeric.
    count(record.get(4)?)?;
    let percentage = count(record.get(5)?)?;

    Some(FeedRow::Periodic(PeriodicRow {
        timestamp,
        actual_usage,
        forecast_usage,
        percentage,
    }))
}

fn momentary(record: &StringRecord) -> Option<FeedRow> {
    if record.len() != MOMENTARY_FIELDS {
        return None;
    }
    let (date, clock, usage) = (record.get(0)?, record.get(1)?, record.get(2)?);
    if !is_feed_date(date) || !is_clock(clock) {
        return None;
    }
    let usage = match usage {
        "" => None,
        value => Some(count(value)?),
    };
    Some(FeedRow::Momentary {
        updated_at: format!("{date} {clock}"),
        usage,
    })
}

fn digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// A non-negative integer written as plain ASCII digits.
fn count(s: &str) -> Option<u32> {
    if digits(s, 1, usize::MAX) {
        s.parse().ok()
    } else {
        None
    }
}

/// `yyyy/M/d`
fn is_feed_date(s: &str) -> bool {
    let mut parts = s.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(y), Some(m), Some(d), None) if digits(y, 4, 4) && digits(m, 1, 2) && digits(d, 1, 2)
    )
}

/// `M/d`
fn is_month_day(s: &str) -> bool {
    matches!(s.split_once('/'), Some((m, d)) if digits(m, 1, 2) && digits(d, 1, 2))
}

/// `H:m`
fn is_clock(s: &str) -> bool {
    matches!(s.split_once(':'), Some((h, m)) if digits(h, 1, 2) && digits(m, 1, 2))
}

/// `H:m〜H:m`; yields the starting hour.
fn time_band_start(s: &str) -> Option<u8> {
    let (start, end) = s.split_once(|c: char| c == '\u{301C}' || c == '\u{FF5E}')?;
    if !is_clock(start) || !is_clock(end) {
        return None;
    }
    start.split_once(':')?.0.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(line: &str) -> StringRecord {
        StringRecord::from(line.split(',').collect::<Vec<_>>())
    }

    #[test]
    fn header_row() {
        assert_eq!(
            classify(&record("2011/7/5 13:05 UPDATE,,,")),
            Some(FeedRow::Header(datetime!(2011-07-05 13:05)))
        );
        assert_eq!(classify(&record("2011/7/5 13:05 UPDATE,,,x")), None);
        assert_eq!(classify(&record("2011/7/5 13:05,,,")), None);
    }

    #[test]
    fn capacity_row_beats_forecast_prefix() {
        let line = "2780,14:00〜15:00,7/5,8:30,2600,2650,2700,2750,2780,2780,2780,2780,2750,2700,2650,2600,2550,2500";
        assert_eq!(classify(&record(line)), Some(FeedRow::Capacity(2780)));
    }

    #[test]
    fn capacity_row_requires_numeric_plan() {
        let line = "2780,14:00〜15:00,7/5,8:30,2600,2650,2700,2750,2780,2780,2780,2780,2750,2700,2650,2600,2550,-";
        assert_eq!(classify(&record(line)), None);
    }

    #[test]
    fn forecast_row_takes_band_start_hour() {
        assert_eq!(
            classify(&record("2450,9:00〜10:00,7/5,8:30")),
            Some(FeedRow::ForecastPeak { usage: 2450, period: 9 })
        );
        assert_eq!(
            classify(&record("2450,14:00～15:00,7/5,8:30")),
            Some(FeedRow::ForecastPeak { usage: 2450, period: 14 })
        );
        assert_eq!(classify(&record("2450,14:00-15:00,7/5,8:30")), None);
    }

    #[test]
    fn periodic_row() {
        assert_eq!(
            classify(&record("2011/7/5,14:00,0,2300,15,83")),
            Some(FeedRow::Periodic(PeriodicRow {
                timestamp: datetime!(2011-07-05 14:00),
                actual_usage: 0,
                forecast_usage: 2300,
                percentage: 83,
            }))
        );
        assert_eq!(classify(&record("2011/7/5,14:00,,2300,15,83")), None);
        assert_eq!(classify(&record("2011/2/30,14:00,2100,2300,15,83")), None);
    }

    #[test]
    fn momentary_rows_with_and_without_usage() {
        assert_eq!(
            classify(&record("2011/7/5,13:05,2205")),
            Some(FeedRow::Momentary {
                updated_at: "2011/7/5 13:05".to_string(),
                usage: Some(2205),
            })
        );
        assert_eq!(
            classify(&record("2011/7/5,13:10,")),
            Some(FeedRow::Momentary {
                updated_at: "2011/7/5 13:10".to_string(),
                usage: None,
            })
        );
        assert_eq!(classify(&record("2011/7/5,13:10,n/a")), None);
    }

    #[test]
    fn unrelated_lines_are_not_classified() {
        for line in [
            "DATE,TIME,当日実績(万kW),予測値(万kW),予備率(%),使用率(%)",
            "ピーク時供給力(万kW),時間帯,供給力情報更新日,供給力情報更新時刻",
            "",
            "+2450,14:00〜15:00,7/5,8:30",
            "99999999999,14:00〜15:00,7/5,8:30",
        ] {
            assert_eq!(classify(&record(line)), None, "{line}");
        }
    }
}
