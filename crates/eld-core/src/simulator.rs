//! Duty-cycle simulation.
//!
//! Turns two driving legs and the driver's cycle state into an ordered,
//! contiguous list of [`DutyEvent`]s that respects the hours-of-service limits
//! in [`crate::hos`].
//!
//! # Algorithm Summary
//!
//! 1. Drive leg 1 in chunks, pickup (1 h), drive leg 2 in chunks, dropoff (1 h).
//! 2. Before every chunk, evaluate the guards in fixed priority order:
//!    34-hour restart, 10-hour rest, 30-minute break, fuel stop.
//! 3. Size the chunk to the tightest remaining headroom (driving limit, break
//!    limit, window minus margin, leg remainder), at least [`MIN_CHUNK_HOURS`].
//!
//! A pickup, dropoff, break or rest of at least 30 minutes satisfies the break
//! requirement and resets the since-break counter. Fuel stops do not.

use chrono::{DateTime, Utc};

use crate::event::{DutyEvent, DutyEventKind, duration_to_hours};
use crate::hos::{
    BREAK_AFTER_DRIVING_HOURS, BREAK_HOURS, CYCLE_LIMIT_HOURS, DROPOFF_HOURS, FUEL_EVERY_MILES,
    FUEL_STOP_HOURS, LABEL_BREAK, LABEL_DROPOFF, LABEL_FUEL, LABEL_PICKUP, LABEL_REST,
    LABEL_RESTART, LABEL_TO_DROPOFF, LABEL_TO_PICKUP, LEG_COMPLETE_MILES, LIMIT_EPSILON_HOURS,
    MAX_DRIVING_HOURS, MAX_WINDOW_HOURS, MIN_CHUNK_HOURS, NEGLIGIBLE_CHUNK_HOURS, PICKUP_HOURS,
    REST_HOURS, RESTART_HOURS, SAFETY_MARGIN_HOURS,
};
use crate::types::{Coordinate, Leg, TripInput};

/// Mutable accumulator for one simulation run.
///
/// Owned by exactly one run; concurrent trips each construct their own.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Hours counted against the 70-hour/8-day cycle.
    pub cycle_used_hours: f64,
    /// Current absolute time.
    pub clock: DateTime<Utc>,
    /// Start of the current 14-hour window, if one is open.
    pub window_start: Option<DateTime<Utc>>,
    /// Hours driven since `window_start`.
    pub driving_in_window: f64,
    /// Hours driven since the last qualifying break.
    pub driving_since_break: f64,
    /// Miles driven since the last fuel stop.
    pub miles_since_fuel: f64,
}

impl SimulationState {
    /// Fresh state at `start` with no window open.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, cycle_used_hours: f64) -> Self {
        Self {
            cycle_used_hours,
            clock: start,
            window_start: None,
            driving_in_window: 0.0,
            driving_since_break: 0.0,
            miles_since_fuel: 0.0,
        }
    }

    /// Hours since the window opened, or 0 without an open window.
    #[must_use]
    pub fn window_elapsed_hours(&self) -> f64 {
        self.window_start
            .map_or(0.0, |start| duration_to_hours(self.clock - start))
    }

    fn open_window(&mut self) {
        self.window_start = Some(self.clock);
        self.driving_in_window = 0.0;
        self.driving_since_break = 0.0;
    }
}

/// Simulates a full trip starting at `start`.
#[must_use]
pub fn simulate(trip: &TripInput, start: DateTime<Utc>) -> Vec<DutyEvent> {
    let (events, _) = simulate_from(trip, SimulationState::new(start, trip.cycle_used_hours()));
    events
}

/// Simulates a full trip from an explicit initial state, returning the events
/// and the final state.
#[must_use]
pub fn simulate_from(
    trip: &TripInput,
    state: SimulationState,
) -> (Vec<DutyEvent>, SimulationState) {
    let waypoints = *trip.waypoints();
    let mut run = Run {
        state,
        events: Vec::new(),
    };

    run.drive_leg(
        trip.to_pickup(),
        waypoints.current,
        waypoints.pickup,
        LABEL_TO_PICKUP,
    );
    run.push(
        DutyEventKind::Pickup,
        PICKUP_HOURS,
        LABEL_PICKUP,
        0.0,
        Some(waypoints.pickup),
    );
    run.drive_leg(
        trip.to_dropoff(),
        waypoints.pickup,
        waypoints.dropoff,
        LABEL_TO_DROPOFF,
    );
    run.push(
        DutyEventKind::Dropoff,
        DROPOFF_HOURS,
        LABEL_DROPOFF,
        0.0,
        Some(waypoints.dropoff),
    );

    tracing::debug!(
        event_count = run.events.len(),
        cycle_used_hours = run.state.cycle_used_hours,
        "simulated trip"
    );
    (run.events, run.state)
}

struct Run {
    state: SimulationState,
    events: Vec<DutyEvent>,
}

impl Run {
    /// Appends an event at the current clock and advances the clock past it.
    fn push(
        &mut self,
        kind: DutyEventKind,
        hours: f64,
        label: &str,
        miles: f64,
        position: Option<Coordinate>,
    ) {
        let event = DutyEvent::new(kind, self.state.clock, hours, label, miles, position);
        self.state.clock = event.end;

        if kind.is_on_duty() {
            self.state.cycle_used_hours += hours;
            if self.state.window_start.is_none() {
                self.state.window_start = Some(event.start);
            }
        }
        if kind.resets_break_clock() && hours >= BREAK_HOURS {
            self.state.driving_since_break = 0.0;
        }

        self.events.push(event);
    }

    fn insert_stop(&mut self, kind: DutyEventKind, hours: f64, label: &str, at: Coordinate) {
        tracing::debug!(
            %kind,
            label,
            at = %self.state.clock,
            cycle_used_hours = self.state.cycle_used_hours,
            driving_in_window = self.state.driving_in_window,
            "inserting stop"
        );
        self.push(kind, hours, label, 0.0, Some(at));
    }

    #[allow(clippy::similar_names)]
    fn drive_leg(&mut self, leg: &Leg, from: Coordinate, to: Coordinate, label: &str) {
        let total_miles = leg.distance_miles();
        let speed = leg.average_speed_mph();
        let mut remaining_miles = total_miles;
        let mut remaining_hours = leg.duration_hours();
        let position_after = |remaining: f64| from.lerp(to, 1.0 - remaining / total_miles);

        while remaining_miles > LEG_COMPLETE_MILES {
            let here = position_after(remaining_miles);

            if self.state.window_start.is_none() {
                self.state.open_window();
            }

            if self.state.cycle_used_hours
                >= CYCLE_LIMIT_HOURS - SAFETY_MARGIN_HOURS - LIMIT_EPSILON_HOURS
            {
                self.insert_stop(DutyEventKind::Rest, RESTART_HOURS, LABEL_RESTART, here);
                self.state.cycle_used_hours = 0.0;
                self.state.open_window();
            }

            let elapsed = self.state.window_elapsed_hours();
            if self.state.driving_in_window >= MAX_DRIVING_HOURS - LIMIT_EPSILON_HOURS
                || elapsed >= MAX_WINDOW_HOURS - SAFETY_MARGIN_HOURS - LIMIT_EPSILON_HOURS
            {
                self.insert_stop(DutyEventKind::Rest, REST_HOURS, LABEL_REST, here);
                self.state.open_window();
            }

            if self.state.driving_since_break >= BREAK_AFTER_DRIVING_HOURS - LIMIT_EPSILON_HOURS {
                self.insert_stop(DutyEventKind::Break, BREAK_HOURS, LABEL_BREAK, here);
                self.state.driving_since_break = 0.0;
            }

            if self.state.miles_since_fuel >= FUEL_EVERY_MILES {
                self.insert_stop(DutyEventKind::Fuel, FUEL_STOP_HOURS, LABEL_FUEL, here);
                self.state.miles_since_fuel = 0.0;
            }

            let elapsed = self.state.window_elapsed_hours();
            let driving_headroom = MAX_DRIVING_HOURS - self.state.driving_in_window;
            let break_headroom = BREAK_AFTER_DRIVING_HOURS - self.state.driving_since_break;
            let planned = driving_headroom
                .min(break_headroom)
                .min(MAX_WINDOW_HOURS - SAFETY_MARGIN_HOURS - elapsed)
                .min(remaining_hours)
                .max(MIN_CHUNK_HOURS);
            // The minimum chunk never pushes past a legal limit.
            let legal = driving_headroom
                .min(break_headroom)
                .min(MAX_WINDOW_HOURS - elapsed);
            let miles = (planned.min(legal) * speed).min(remaining_miles);
            let hours = miles / speed;

            // A negligible chunk only ends the leg if it would finish it anyway;
            // a sliver of legal headroom is driven and the next pass rests.
            if hours < NEGLIGIBLE_CHUNK_HOURS && remaining_miles - miles <= LEG_COMPLETE_MILES {
                tracing::debug!(remaining_miles, hours, "leg ended on negligible chunk");
                break;
            }

            let position = position_after(remaining_miles - miles);
            self.push(DutyEventKind::Driving, hours, label, miles, Some(position));

            self.state.driving_in_window += hours;
            self.state.driving_since_break += hours;
            self.state.cycle_used_hours += hours;
            self.state.miles_since_fuel += miles;
            remaining_miles -= miles;
            remaining_hours -= hours;
        }
    }
}
