//! Daily log sheets.
//!
//! Folds a simulated event list into one 24-hour log per calendar date:
//! events are cut at midnight, uncovered time becomes off duty, and each day
//! gets per-status hour totals.
//!
//! Days are anchored at midnight of a single fixed UTC offset for the whole
//! trip (UTC unless the caller picks another offset). Segment boundaries are
//! rounded to hundredths of an hour before gap filling, so a day's segments
//! always telescope to exactly 24 hours.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{DutyEvent, duration_to_hours};
use crate::hos::LABEL_OFF_DUTY;
use crate::round::hundredths;

/// Hours in a log day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Gaps up to this size are closed by snapping rather than filled.
pub const GAP_TOLERANCE_HOURS: f64 = 0.01;

/// The four lines of a log-sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyStatus {
    #[serde(rename = "OFF")]
    OffDuty,
    #[serde(rename = "SB")]
    SleeperBerth,
    #[serde(rename = "D")]
    Driving,
    #[serde(rename = "ON")]
    OnDuty,
}

impl DutyStatus {
    /// Grid order, top to bottom.
    pub const ALL: [Self; 4] = [
        Self::OffDuty,
        Self::SleeperBerth,
        Self::Driving,
        Self::OnDuty,
    ];

    /// Short code printed on the grid.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::OffDuty => "OFF",
            Self::SleeperBerth => "SB",
            Self::Driving => "D",
            Self::OnDuty => "ON",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::OffDuty => "Off Duty",
            Self::SleeperBerth => "Sleeper Berth",
            Self::Driving => "Driving",
            Self::OnDuty => "On Duty (Not Driving)",
        }
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A contiguous span of one status within a log day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogSegment {
    /// Hours since midnight, in `[0, 24)`.
    pub start_hour: f64,
    /// Hours since midnight, in `(0, 24]`.
    pub end_hour: f64,
    pub status: DutyStatus,
    pub label: String,
}

impl DailyLogSegment {
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }

    fn off_duty(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            status: DutyStatus::OffDuty,
            label: LABEL_OFF_DUTY.to_string(),
        }
    }
}

/// Hours per status for one log day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogTotals {
    pub off_duty: f64,
    pub sleeper: f64,
    pub driving: f64,
    pub on_duty: f64,
}

impl LogTotals {
    #[must_use]
    pub const fn get(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::SleeperBerth => self.sleeper,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDuty => self.on_duty,
        }
    }

    fn add(&mut self, status: DutyStatus, hours: f64) {
        let slot = match status {
            DutyStatus::OffDuty => &mut self.off_duty,
            DutyStatus::SleeperBerth => &mut self.sleeper,
            DutyStatus::Driving => &mut self.driving,
            DutyStatus::OnDuty => &mut self.on_duty,
        };
        *slot += hours;
    }

    fn rounded(self) -> Self {
        Self {
            off_duty: hundredths(self.off_duty),
            sleeper: hundredths(self.sleeper),
            driving: hundredths(self.driving),
            on_duty: hundredths(self.on_duty),
        }
    }

    /// Sum of all four statuses.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.off_duty + self.sleeper + self.driving + self.on_duty
    }
}

/// One calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub segments: Vec<DailyLogSegment>,
    pub totals: LogTotals,
}

/// Builds daily logs with days anchored at UTC midnight.
#[must_use]
pub fn build_logs(events: &[DutyEvent]) -> Vec<DailyLog> {
    build_logs_with_offset(events, Utc.fix())
}

/// Builds daily logs with days anchored at midnight of `offset`.
///
/// Returns one log per distinct date touched by any event, ascending.
#[must_use]
pub fn build_logs_with_offset(events: &[DutyEvent], offset: FixedOffset) -> Vec<DailyLog> {
    let mut by_date: BTreeMap<NaiveDate, Vec<DailyLogSegment>> = BTreeMap::new();

    for event in events {
        for (date, segment) in split_at_midnight(event, offset) {
            by_date.entry(date).or_default().push(segment);
        }
    }

    by_date
        .into_iter()
        .map(|(date, segments)| fill_day(date, segments))
        .collect()
}

/// Cuts an event into per-day segments.
fn split_at_midnight(
    event: &DutyEvent,
    offset: FixedOffset,
) -> Vec<(NaiveDate, DailyLogSegment)> {
    let mut pieces = Vec::new();
    let status = event.kind.log_status();
    let end = event.end.with_timezone(&offset);
    let mut cursor = event.start.with_timezone(&offset);

    while cursor < end {
        let day_start = local_midnight(cursor);
        let day_end = day_start + Duration::days(1);
        let piece_end = end.min(day_end);

        let start_hour = hundredths(duration_to_hours(cursor - day_start));
        let end_hour = if piece_end == day_end {
            HOURS_PER_DAY
        } else {
            hundredths(duration_to_hours(piece_end - day_start))
        };

        if end_hour > start_hour {
            pieces.push((
                cursor.date_naive(),
                DailyLogSegment {
                    start_hour,
                    end_hour,
                    status,
                    label: event.label.clone(),
                },
            ));
        }
        cursor = piece_end;
    }

    pieces
}

fn local_midnight(at: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let since_midnight = Duration::seconds(i64::from(at.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(at.nanosecond()));
    at - since_midnight
}

/// Sorts a day's segments, fills gaps with off duty, and totals the day.
fn fill_day(date: NaiveDate, mut segments: Vec<DailyLogSegment>) -> DailyLog {
    segments.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));

    let mut filled = Vec::with_capacity(segments.len() * 2 + 1);
    let mut last_end = 0.0;

    for mut segment in segments {
        if segment.start_hour > last_end + GAP_TOLERANCE_HOURS {
            filled.push(DailyLogSegment::off_duty(last_end, segment.start_hour));
        } else {
            segment.start_hour = last_end;
        }
        if segment.end_hour <= segment.start_hour {
            continue;
        }
        last_end = segment.end_hour;
        filled.push(segment);
    }

    if last_end < HOURS_PER_DAY {
        filled.push(DailyLogSegment::off_duty(last_end, HOURS_PER_DAY));
    }

    let mut totals = LogTotals::default();
    for segment in &filled {
        totals.add(segment.status, segment.duration_hours());
    }

    DailyLog {
        date,
        segments: filled,
        totals: totals.rounded(),
    }
}
