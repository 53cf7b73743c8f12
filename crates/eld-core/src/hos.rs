//! Hours-of-service limits for a solo property-carrying driver.
//!
//! The simulator trips the cycle and window checks one hour before the legal
//! ceiling ([`SAFETY_MARGIN_HOURS`]). Golden outputs depend on that margin.

/// Maximum driving hours inside one duty window.
pub const MAX_DRIVING_HOURS: f64 = 11.0;

/// Length of the on-duty window opened by the first on-duty activity.
pub const MAX_WINDOW_HOURS: f64 = 14.0;

/// Rolling 70-hour/8-day cycle ceiling.
pub const CYCLE_LIMIT_HOURS: f64 = 70.0;

/// Applied below [`MAX_WINDOW_HOURS`] and [`CYCLE_LIMIT_HOURS`].
pub const SAFETY_MARGIN_HOURS: f64 = 1.0;

pub const REST_HOURS: f64 = 10.0;
pub const RESTART_HOURS: f64 = 34.0;

/// Cumulative driving that requires a break.
pub const BREAK_AFTER_DRIVING_HOURS: f64 = 8.0;
pub const BREAK_HOURS: f64 = 0.5;

pub const FUEL_EVERY_MILES: f64 = 1000.0;
pub const FUEL_STOP_HOURS: f64 = 0.5;

pub const PICKUP_HOURS: f64 = 1.0;
pub const DROPOFF_HOURS: f64 = 1.0;

/// A leg with this many miles or fewer left is complete.
pub const LEG_COMPLETE_MILES: f64 = 0.5;

/// Smallest chunk the simulator will plan, to guarantee progress.
pub const MIN_CHUNK_HOURS: f64 = 0.1;

/// Chunks shorter than this that do not finish the leg end the leg loop.
pub const NEGLIGIBLE_CHUNK_HOURS: f64 = 0.05;

/// Slack for comparing accumulated floating-point hours against limits.
pub const LIMIT_EPSILON_HOURS: f64 = 1e-6;

pub const LABEL_TO_PICKUP: &str = "Driving to Pickup";
pub const LABEL_TO_DROPOFF: &str = "Driving to Dropoff";
pub const LABEL_PICKUP: &str = "Pickup - Loading";
pub const LABEL_DROPOFF: &str = "Dropoff - Unloading";
pub const LABEL_REST: &str = "10-Hour Rest";
pub const LABEL_RESTART: &str = "34-Hour Restart";
pub const LABEL_BREAK: &str = "30-Minute Break";
pub const LABEL_FUEL: &str = "Fuel Stop";
pub const LABEL_OFF_DUTY: &str = "Off Duty";
