//! Whole-trip totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::daily_log::DailyLog;
use crate::event::{DutyEvent, DutyEventKind};
use crate::round::hundredths;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_distance_miles: f64,
    pub total_driving_hours: f64,
    /// Rest and break time.
    pub total_rest_hours: f64,
    /// Pickup, dropoff and other non-driving on-duty time.
    pub total_on_duty_hours: f64,
    /// Number of log sheets the trip spans.
    pub total_days: usize,
    pub trip_start: Option<DateTime<Utc>>,
    pub trip_end: Option<DateTime<Utc>>,
}

impl TripSummary {
    #[must_use]
    pub fn from_events(events: &[DutyEvent], logs: &[DailyLog]) -> Self {
        let mut miles = 0.0;
        let mut driving = 0.0;
        let mut rest = 0.0;
        let mut on_duty = 0.0;

        for event in events {
            match event.kind {
                DutyEventKind::Driving => {
                    miles += event.miles;
                    driving += event.duration_hours;
                }
                DutyEventKind::Rest | DutyEventKind::Break => rest += event.duration_hours,
                kind if kind.is_on_duty() => on_duty += event.duration_hours,
                _ => {}
            }
        }

        Self {
            total_distance_miles: hundredths(miles),
            total_driving_hours: hundredths(driving),
            total_rest_hours: hundredths(rest),
            total_on_duty_hours: hundredths(on_duty),
            total_days: logs.len(),
            trip_start: events.first().map(|e| e.start),
            trip_end: events.last().map(|e| e.end),
        }
    }
}
