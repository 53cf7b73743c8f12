//! A complete trip plan: events, log sheets and totals.

use chrono::{DateTime, FixedOffset, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::daily_log::{DailyLog, build_logs_with_offset};
use crate::event::DutyEvent;
use crate::simulator::simulate;
use crate::summary::TripSummary;
use crate::types::TripInput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub summary: TripSummary,
    pub events: Vec<DutyEvent>,
    pub daily_logs: Vec<DailyLog>,
}

impl Schedule {
    /// Simulates `trip` from `start` and folds the result into log sheets whose
    /// days begin at midnight of `log_offset`.
    #[must_use]
    pub fn compute(trip: &TripInput, start: DateTime<Utc>, log_offset: FixedOffset) -> Self {
        let events = simulate(trip, start);
        let daily_logs = build_logs_with_offset(&events, log_offset);
        let summary = TripSummary::from_events(&events, &daily_logs);

        tracing::info!(
            miles = summary.total_distance_miles,
            days = summary.total_days,
            events = events.len(),
            "trip planned"
        );

        Self {
            summary,
            events,
            daily_logs,
        }
    }
}

/// Plans independent trips in parallel. Output order matches input order.
#[must_use]
pub fn plan_batch(
    trips: &[TripInput],
    start: DateTime<Utc>,
    log_offset: FixedOffset,
) -> Vec<Schedule> {
    trips
        .par_iter()
        .map(|trip| Schedule::compute(trip, start, log_offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    use crate::event::DutyEventKind;
    use crate::types::{Coordinate, Leg, Waypoints};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn trip(leg1: (f64, f64), leg2: (f64, f64), cycle: f64) -> TripInput {
        TripInput::new(
            Leg::new(leg1.0, leg1.1).unwrap(),
            Leg::new(leg2.0, leg2.1).unwrap(),
            cycle,
            Waypoints {
                current: Coordinate::new(41.88, -87.63).unwrap(),
                pickup: Coordinate::new(38.63, -90.20).unwrap(),
                dropoff: Coordinate::new(32.78, -96.80).unwrap(),
            },
        )
        .unwrap()
    }

    #[test]
    fn short_trip_schedule() {
        let schedule = Schedule::compute(&trip((250.0, 4.5), (300.0, 5.5), 0.0), start(), Utc.fix());

        assert_eq!(schedule.events.len(), 4);
        assert_eq!(schedule.daily_logs.len(), 1);
        assert!((schedule.summary.total_distance_miles - 550.0).abs() < 0.1);
        assert!((schedule.summary.total_driving_hours - 10.0).abs() < 1e-9);
        assert!((schedule.summary.total_on_duty_hours - 2.0).abs() < 1e-9);
        assert!(schedule.summary.total_rest_hours.abs() < 1e-9);
        assert_eq!(schedule.summary.total_days, 1);
    }

    #[test]
    fn serialized_schedule_shape() {
        let schedule = Schedule::compute(&trip((250.0, 4.5), (300.0, 5.5), 0.0), start(), Utc.fix());
        let json = serde_json::to_value(&schedule).unwrap();

        assert_eq!(json["events"][1]["type"], "pickup");
        assert_eq!(json["events"][1]["label"], "Pickup - Loading");
        assert_eq!(json["daily_logs"][0]["date"], "2025-03-10");
        assert_eq!(json["daily_logs"][0]["segments"][1]["status"], "D");
        assert_eq!(json["daily_logs"][0]["totals"]["driving"], 10.0);
        assert_eq!(json["summary"]["total_days"], 1);
        assert_eq!(json["summary"]["trip_start"], "2025-03-10T08:00:00Z");
    }

    #[test]
    fn batch_preserves_order_and_isolates_state() {
        let trips = vec![
            trip((250.0, 4.5), (300.0, 5.5), 0.0),
            trip((600.0, 10.0), (300.0, 5.0), 69.0),
            trip((250.0, 4.5), (300.0, 5.5), 0.0),
        ];
        let schedules = plan_batch(&trips, start(), Utc.fix());

        assert_eq!(schedules.len(), 3);
        assert_eq!(schedules[0], schedules[2]);
        assert_eq!(schedules[1].events[0].kind, DutyEventKind::Rest);
        assert_eq!(schedules[1].events[0].label, "34-Hour Restart");
        for (schedule, trip) in schedules.iter().zip(&trips) {
            assert_eq!(*schedule, Schedule::compute(trip, start(), Utc.fix()));
        }
    }
}
