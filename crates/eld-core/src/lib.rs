//! Core domain logic for the ELD trip planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Simulation: laying out a two-leg trip as hours-of-service compliant duty events
//! - Daily logs: folding duty events into per-day log sheets with totals
//! - Scheduling: bundling events, logs and trip totals, one trip or many in parallel

pub mod daily_log;
pub mod event;
pub mod hos;
mod round;
pub mod schedule;
pub mod simulator;
mod summary;
pub mod types;

pub use daily_log::{
    DailyLog, DailyLogSegment, DutyStatus, LogTotals, build_logs, build_logs_with_offset,
};
pub use event::{DutyEvent, DutyEventKind, UnknownEventKind};
pub use round::hundredths;
pub use schedule::{Schedule, plan_batch};
pub use simulator::{SimulationState, simulate, simulate_from};
pub use summary::TripSummary;
pub use types::{Coordinate, Leg, TripInput, ValidationError, Waypoints};
