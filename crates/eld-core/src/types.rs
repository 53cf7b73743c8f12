//! Trip input types with validation.
//!
//! The simulator only accepts a [`TripInput`], so every value it sees has
//! already been checked here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hos::CYCLE_LIMIT_HOURS;

/// Validation errors for trip inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The value was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// The value was zero or negative.
    #[error("{field} must be greater than 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// Cycle hours outside `[0, 70)`.
    #[error("cycle hours used must be between 0 and 70, got {value}")]
    CycleOutOfRange { value: f64 },

    /// Latitude outside `[-90, 90]`.
    #[error("latitude must be between -90 and 90, got {value}")]
    LatitudeOutOfRange { value: f64 },

    /// Longitude outside `[-180, 180]`.
    #[error("longitude must be between -180 and 180, got {value}")]
    LongitudeOutOfRange { value: f64 },
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value)
}

/// A latitude/longitude pair in decimal degrees. Defaults to `0,0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Creates a coordinate after range validation.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() {
            return Err(ValidationError::NotFinite { field: "latitude" });
        }
        if !lon.is_finite() {
            return Err(ValidationError::NotFinite { field: "longitude" });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange { value: lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::LongitudeOutOfRange { value: lon });
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }

    /// Linear interpolation towards `to`, latitude and longitude independently.
    ///
    /// `progress` is clamped to `[0, 1]`; NaN is treated as 0.
    #[must_use]
    pub fn lerp(self, to: Self, progress: f64) -> Self {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        Self {
            lat: (to.lat - self.lat).mul_add(t, self.lat),
            lon: (to.lon - self.lon).mul_add(t, self.lon),
        }
    }
}

/// One point-to-point driving leg as reported by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLeg")]
pub struct Leg {
    distance_miles: f64,
    duration_hours: f64,
}

#[derive(Deserialize)]
struct RawLeg {
    distance_miles: f64,
    duration_hours: f64,
}

impl TryFrom<RawLeg> for Leg {
    type Error = ValidationError;

    fn try_from(raw: RawLeg) -> Result<Self, Self::Error> {
        Self::new(raw.distance_miles, raw.duration_hours)
    }
}

impl Leg {
    /// Creates a leg; both distance and duration must be positive.
    pub fn new(distance_miles: f64, duration_hours: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            distance_miles: require_positive("distance_miles", distance_miles)?,
            duration_hours: require_positive("duration_hours", duration_hours)?,
        })
    }

    #[must_use]
    pub const fn distance_miles(&self) -> f64 {
        self.distance_miles
    }

    #[must_use]
    pub const fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    /// Average speed over the whole leg, held constant while simulating it.
    #[must_use]
    pub fn average_speed_mph(&self) -> f64 {
        self.distance_miles / self.duration_hours
    }
}

/// The three fixed points of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoints {
    pub current: Coordinate,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
}

/// A validated trip-planning request: two legs plus the driver's cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTripInput")]
pub struct TripInput {
    to_pickup: Leg,
    to_dropoff: Leg,
    cycle_used_hours: f64,
    waypoints: Waypoints,
}

#[derive(Deserialize)]
struct RawTripInput {
    to_pickup: Leg,
    to_dropoff: Leg,
    #[serde(default)]
    cycle_used_hours: f64,
    waypoints: Waypoints,
}

impl TryFrom<RawTripInput> for TripInput {
    type Error = ValidationError;

    fn try_from(raw: RawTripInput) -> Result<Self, Self::Error> {
        Self::new(
            raw.to_pickup,
            raw.to_dropoff,
            raw.cycle_used_hours,
            raw.waypoints,
        )
    }
}

impl TripInput {
    /// Creates a trip input. Cycle hours must lie in `[0, 70)`.
    pub fn new(
        to_pickup: Leg,
        to_dropoff: Leg,
        cycle_used_hours: f64,
        waypoints: Waypoints,
    ) -> Result<Self, ValidationError> {
        if !cycle_used_hours.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "cycle_used_hours",
            });
        }
        if !(0.0..CYCLE_LIMIT_HOURS).contains(&cycle_used_hours) {
            return Err(ValidationError::CycleOutOfRange {
                value: cycle_used_hours,
            });
        }
        Ok(Self {
            to_pickup,
            to_dropoff,
            cycle_used_hours,
            waypoints,
        })
    }

    #[must_use]
    pub const fn to_pickup(&self) -> &Leg {
        &self.to_pickup
    }

    #[must_use]
    pub const fn to_dropoff(&self) -> &Leg {
        &self.to_dropoff
    }

    #[must_use]
    pub const fn cycle_used_hours(&self) -> f64 {
        self.cycle_used_hours
    }

    #[must_use]
    pub const fn waypoints(&self) -> &Waypoints {
        &self.waypoints
    }

    /// Combined distance of both legs.
    #[must_use]
    pub fn total_miles(&self) -> f64 {
        self.to_pickup.distance_miles + self.to_dropoff.distance_miles
    }
}
