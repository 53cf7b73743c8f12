//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use eld_core::Coordinate;
use regex::Regex;

use crate::Config;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(in)\s+)?(\d+)\s+(minute|hour|day|week)s?(?:\s+(ago))?$")
        .expect("relative time pattern is valid")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either RFC 3339 or relative time.
///
/// Supports:
/// - RFC 3339: "2026-01-15T10:30:00Z"
/// - Past: "2 hours ago", "30 minutes ago", "1 day ago"
/// - Future: "in 3 hours", "in 1 week"
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    parse_datetime_at(s, Utc::now())
}

fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let caps = RELATIVE_TIME_RE
        .captures(s)
        .filter(|caps| caps.get(1).is_some() != caps.get(4).is_some())
        .with_context(|| {
            format!(
                "Invalid datetime: {s}. Use RFC 3339 (e.g., 2026-01-15T08:00:00Z) or relative (e.g., '2 hours ago', 'in 3 hours')"
            )
        })?;

    let n: i64 = caps[2]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[3] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[3]);
    }

    let duration = Duration::minutes(n * minutes_per_unit);
    if caps.get(1).is_some() {
        Ok(now + duration)
    } else {
        Ok(now - duration)
    }
}

/// `hour`:00 tomorrow in `offset`, as a UTC instant.
pub fn default_start(now: DateTime<Utc>, offset: FixedOffset, hour: u32) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)
        .with_context(|| format!("start_hour must be 0-23, got {hour}"))?;
    let tomorrow = now
        .with_timezone(&offset)
        .date_naive()
        .succ_opt()
        .context("date out of range")?;
    offset
        .from_local_datetime(&tomorrow.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .context("ambiguous start time")
}

/// Resolves `--start`, falling back to the configured default.
pub fn resolve_start(start: Option<&str>, config: &Config) -> Result<DateTime<Utc>> {
    match start {
        Some(s) => parse_datetime(s),
        None => default_start(Utc::now(), log_offset(config)?, config.start_hour),
    }
}

pub fn log_offset(config: &Config) -> Result<FixedOffset> {
    config.log_offset().with_context(|| {
        format!(
            "log_utc_offset_minutes out of range: {}",
            config.log_utc_offset_minutes
        )
    })
}

/// Parses `LAT,LON` for clap.
pub fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude: {lat:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude: {lon:?}"))?;
    Coordinate::new(lat, lon).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0)
            .single()
            .expect("valid test timestamp")
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime_at("2025-03-11T08:00:00-05:00", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 11, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_relative_past_and_future() {
        assert_eq!(
            parse_datetime_at("2 hours ago", now()).unwrap(),
            now() - Duration::hours(2)
        );
        assert_eq!(
            parse_datetime_at("in 3 days", now()).unwrap(),
            now() + Duration::days(3)
        );
        assert_eq!(
            parse_datetime_at("in 1 week", now()).unwrap(),
            now() + Duration::weeks(1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime_at("tomorrow", now()).is_err());
        assert!(parse_datetime_at("3 hours", now()).is_err());
        assert!(parse_datetime_at("in 3 hours ago", now()).is_err());
        assert!(parse_datetime_at("99999999999 weeks ago", now()).is_err());
    }

    #[test]
    fn test_default_start_is_tomorrow_morning() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            default_start(now(), utc, 8).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap()
        );

        // 15:30 UTC is already the 11th in UTC+10.
        let sydney = FixedOffset::east_opt(10 * 3600).unwrap();
        assert_eq!(
            default_start(now(), sydney, 8).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 11, 22, 0, 0).unwrap()
        );

        assert!(default_start(now(), utc, 24).is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        let point = parse_coordinate("41.88, -87.63").unwrap();
        assert!((point.lat() - 41.88).abs() < 1e-9);
        assert!((point.lon() + 87.63).abs() < 1e-9);

        assert!(parse_coordinate("41.88").is_err());
        assert!(parse_coordinate("north,west").is_err());
        assert!(parse_coordinate("95,0").is_err());
    }
}
