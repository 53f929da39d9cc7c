use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::table::CellValue;

pub const ABSOLUTE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

/// Formats tooltip timestamps, either as a calendar date or as a
/// "time ago" phrase relative to a fixed `now`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormatter {
    zone: TimeZoneMode,
    now: DateTime<Utc>,
}

impl TimeFormatter {
    pub fn new(zone: TimeZoneMode, now: DateTime<Utc>) -> Self {
        Self { zone, now }
    }

    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(TimeZoneMode::Utc, now)
    }

    pub fn now(zone: TimeZoneMode) -> Self {
        Self::new(zone, Utc::now())
    }

    /// Returns an empty string for cells that don't hold a timestamp.
    pub fn format(&self, value: &CellValue, elapsed: bool) -> String {
        let Some(millis) = value.as_epoch_millis() else {
            return String::new();
        };
        let formatted = if elapsed {
            self.elapsed(millis)
        } else {
            self.absolute(millis)
        };
        formatted.unwrap_or_default()
    }

    pub fn absolute(&self, millis: i64) -> Option<String> {
        let ts = DateTime::<Utc>::from_timestamp_millis(millis)?;
        let s = match self.zone {
            TimeZoneMode::Utc => ts.format(ABSOLUTE_FORMAT).to_string(),
            TimeZoneMode::Local => ts.with_timezone(&Local).format(ABSOLUTE_FORMAT).to_string(),
        };
        Some(s)
    }

    pub fn elapsed(&self, millis: i64) -> Option<String> {
        let ts = DateTime::<Utc>::from_timestamp_millis(millis)?;
        let diff = self.now.signed_duration_since(ts).num_milliseconds();
        let phrase = humanize(diff.unsigned_abs() as f64 / 1000.0);
        if diff < 0 {
            Some(format!("in {phrase}"))
        } else {
            Some(format!("{phrase} ago"))
        }
    }
}

fn humanize(secs: f64) -> String {
    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3_600.0).round();
    let days = (secs / 86_400.0).round();
    let months = (secs / 86_400.0 / DAYS_PER_MONTH).round();
    let years = (secs / 86_400.0 / DAYS_PER_MONTH / 12.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const NEW_YEAR: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    fn formatter() -> TimeFormatter {
        TimeFormatter::utc(Utc.timestamp_millis_opt(NEW_YEAR).unwrap())
    }

    #[test]
    fn absolute_in_utc() {
        let f = formatter();
        assert_eq!(
            f.format(&CellValue::Time(NEW_YEAR), false),
            "2024-01-01 00:00:00"
        );
        assert_eq!(
            f.format(&CellValue::Time(NEW_YEAR + 61_000), false),
            "2024-01-01 00:01:01"
        );
    }

    #[test]
    fn non_time_cells_format_empty() {
        let f = formatter();
        assert_eq!(f.format(&CellValue::Null, false), "");
        assert_eq!(f.format(&CellValue::from("yesterday"), true), "");
    }

    #[test]
    fn elapsed_phrases() {
        let f = formatter();
        let ago = |secs: i64| f.format(&CellValue::Time(NEW_YEAR - secs * 1000), true);
        assert_eq!(ago(10), "a few seconds ago");
        assert_eq!(ago(60), "a minute ago");
        assert_eq!(ago(5 * 60), "5 minutes ago");
        assert_eq!(ago(50 * 60), "an hour ago");
        assert_eq!(ago(3 * 3_600), "3 hours ago");
        assert_eq!(ago(30 * 3_600), "a day ago");
        assert_eq!(ago(4 * 86_400), "4 days ago");
        assert_eq!(ago(30 * 86_400), "a month ago");
        assert_eq!(ago(90 * 86_400), "3 months ago");
        assert_eq!(ago(365 * 86_400), "a year ago");
        assert_eq!(ago(3 * 365 * 86_400), "3 years ago");
    }

    #[test]
    fn elapsed_in_the_future() {
        let f = formatter();
        assert_eq!(
            f.format(&CellValue::Time(NEW_YEAR + 2 * 3_600_000), true),
            "in 2 hours"
        );
    }
}
