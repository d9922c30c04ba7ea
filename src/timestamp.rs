//! Text timestamps for the trial log.
//!
//! [TimestampStyle::Iso8601] is the default. [TimestampStyle::Legacy]
//! reproduces the log format of earlier sessions byte for byte: the default
//! text form of the instant with its last two characters replaced by the
//! second-of-minute, so `14:03:07.123456` becomes `14:03:07.12347`.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// How much of the instant to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampMode {
    /// Wall clock time only, used for individual key presses
    TimeOnly,
    /// Date and time, used for the session start
    DateTime,
}

/// Which text format to emit.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum TimestampStyle {
    #[default]
    Iso8601,
    Legacy,
}

/// Format `instant` in the given mode and style.
pub fn format_timestamp(
    instant: &NaiveDateTime,
    mode: TimestampMode,
    style: TimestampStyle,
) -> String {
    match style {
        TimestampStyle::Iso8601 => match mode {
            TimestampMode::TimeOnly => instant.format("%H:%M:%S%.6f").to_string(),
            TimestampMode::DateTime => instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        },
        TimestampStyle::Legacy => legacy(instant, mode),
    }
}

/// The current local time in the given mode and style.
pub fn now(mode: TimestampMode, style: TimestampStyle) -> String {
    format_timestamp(&chrono::Local::now().naive_local(), mode, style)
}

fn legacy(instant: &NaiveDateTime, mode: TimestampMode) -> String {
    // Leap seconds show up as nanoseconds past one billion
    let micros = (instant.nanosecond() % 1_000_000_000) / 1_000;
    let mut text = instant.format("%Y-%m-%d %H:%M:%S").to_string();
    if micros != 0 {
        text.push_str(&format!(".{:06}", micros));
    }

    let kept = match mode {
        TimestampMode::TimeOnly => text.split_once(' ').map_or("", |(_, time)| time),
        TimestampMode::DateTime => text.as_str(),
    };

    // Every character here is ASCII, so byte slicing is safe
    let cut = kept.len().saturating_sub(2);
    format!("{}{}", &kept[..cut], instant.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_micro_opt(14, 3, 7, micro)
            .unwrap()
    }

    #[test]
    fn iso_time_only() {
        let s = format_timestamp(&instant(123456), TimestampMode::TimeOnly, TimestampStyle::Iso8601);
        assert_eq!(s, "14:03:07.123456");
    }

    #[test]
    fn iso_date_time() {
        let s = format_timestamp(&instant(5), TimestampMode::DateTime, TimestampStyle::Iso8601);
        assert_eq!(s, "2024-03-07T14:03:07.000005");
    }

    #[test]
    fn legacy_time_only_splices_seconds() {
        let s = format_timestamp(&instant(123456), TimestampMode::TimeOnly, TimestampStyle::Legacy);
        assert_eq!(s, "14:03:07.12347");
    }

    #[test]
    fn legacy_date_time_splices_seconds() {
        let s = format_timestamp(&instant(123456), TimestampMode::DateTime, TimestampStyle::Legacy);
        assert_eq!(s, "2024-03-07 14:03:07.12347");
    }

    #[test]
    fn legacy_without_fraction_eats_the_seconds_field() {
        let s = format_timestamp(&instant(0), TimestampMode::TimeOnly, TimestampStyle::Legacy);
        assert_eq!(s, "14:03:7");
    }

    #[test]
    fn now_is_nonempty() {
        assert!(!now(TimestampMode::TimeOnly, TimestampStyle::Iso8601).is_empty());
    }
}
