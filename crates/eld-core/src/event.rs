//! Duty events produced by the simulator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::daily_log::DutyStatus;
use crate::round::serialize_hundredths;
use crate::types::Coordinate;

/// The closed set of activities a trip schedule is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyEventKind {
    Driving,
    Rest,
    Break,
    Fuel,
    OnDuty,
    Pickup,
    Dropoff,
}

impl DutyEventKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Driving,
        Self::Rest,
        Self::Break,
        Self::Fuel,
        Self::OnDuty,
        Self::Pickup,
        Self::Dropoff,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Rest => "rest",
            Self::Break => "break",
            Self::Fuel => "fuel",
            Self::OnDuty => "on_duty",
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
        }
    }

    /// The log-sheet line this activity is drawn on.
    #[must_use]
    pub const fn log_status(self) -> DutyStatus {
        match self {
            Self::Driving => DutyStatus::Driving,
            Self::Rest => DutyStatus::SleeperBerth,
            Self::Break | Self::Fuel => DutyStatus::OffDuty,
            Self::OnDuty | Self::Pickup | Self::Dropoff => DutyStatus::OnDuty,
        }
    }

    /// Whether the activity counts against the on-duty cycle.
    #[must_use]
    pub const fn is_on_duty(self) -> bool {
        matches!(self, Self::OnDuty | Self::Pickup | Self::Dropoff)
    }

    /// Whether a long enough stop of this kind counts as the 30-minute break.
    #[must_use]
    pub const fn resets_break_clock(self) -> bool {
        matches!(self, Self::Pickup | Self::Dropoff | Self::Break | Self::Rest)
    }
}

impl fmt::Display for DutyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DutyEventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

impl Serialize for DutyEventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DutyEventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown duty event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown duty event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

/// One activity in a trip schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyEvent {
    #[serde(rename = "type")]
    pub kind: DutyEventKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Unrounded; serialized to two decimals.
    #[serde(serialize_with = "serialize_hundredths")]
    pub duration_hours: f64,
    pub label: String,
    /// Distance covered; zero for anything but driving.
    #[serde(serialize_with = "serialize_hundredths")]
    pub miles: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinate>,
}

impl DutyEvent {
    /// Creates an event starting at `start` and lasting `hours`.
    #[must_use]
    pub fn new(
        kind: DutyEventKind,
        start: DateTime<Utc>,
        hours: f64,
        label: impl Into<String>,
        miles: f64,
        position: Option<Coordinate>,
    ) -> Self {
        Self {
            kind,
            start,
            end: start + hours_to_duration(hours),
            duration_hours: hours,
            label: label.into(),
            miles,
            position,
        }
    }
}

/// Converts fractional hours to a chrono duration at microsecond precision.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "trip durations are far below i64 microseconds"
)]
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::microseconds((hours * 3_600_000_000.0).round() as i64)
}

/// Converts a chrono duration to fractional hours.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "microsecond counts of trip spans fit in f64 mantissa"
)]
pub fn duration_to_hours(duration: Duration) -> f64 {
    duration.num_microseconds().unwrap_or(i64::MAX) as f64 / 3_600_000_000.0
}
