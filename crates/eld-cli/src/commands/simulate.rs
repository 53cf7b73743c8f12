//! Plan a trip from known leg distances and durations, without network access.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use eld_core::{Coordinate, Leg, Schedule, TripInput, Waypoints};

use crate::Config;
use crate::commands::render::write_report;
use crate::commands::util::{log_offset, parse_coordinate, resolve_start};

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Miles from the current location to the pickup.
    #[arg(long)]
    pub leg1_miles: f64,

    /// Hours from the current location to the pickup.
    #[arg(long)]
    pub leg1_hours: f64,

    /// Miles from the pickup to the dropoff.
    #[arg(long)]
    pub leg2_miles: f64,

    /// Hours from the pickup to the dropoff.
    #[arg(long)]
    pub leg2_hours: f64,

    /// Hours already used in the current 70-hour/8-day cycle.
    #[arg(long, default_value_t = 0.0)]
    pub cycle_used: f64,

    /// Current location as LAT,LON. Positions only annotate events.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub current: Option<Coordinate>,

    /// Pickup location as LAT,LON.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub pickup: Option<Coordinate>,

    /// Dropoff location as LAT,LON.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub dropoff: Option<Coordinate>,

    /// Trip start (RFC 3339 or relative, e.g. "in 2 hours"). Defaults to the
    /// configured hour tomorrow.
    #[arg(long)]
    pub start: Option<String>,

    /// Print the full plan as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SimulateArgs {
    fn trip(&self) -> Result<TripInput> {
        let to_pickup = Leg::new(self.leg1_miles, self.leg1_hours).context("invalid leg 1")?;
        let to_dropoff = Leg::new(self.leg2_miles, self.leg2_hours).context("invalid leg 2")?;
        let origin = Coordinate::default();
        let waypoints = Waypoints {
            current: self.current.unwrap_or(origin),
            pickup: self.pickup.unwrap_or(origin),
            dropoff: self.dropoff.unwrap_or(origin),
        };
        TripInput::new(to_pickup, to_dropoff, self.cycle_used, waypoints)
            .context("invalid trip input")
    }
}

pub fn run<W: Write>(writer: &mut W, args: &SimulateArgs, config: &Config) -> Result<()> {
    let trip = args.trip()?;
    let start = resolve_start(args.start.as_deref(), config)?;
    let offset = log_offset(config)?;

    let schedule = Schedule::compute(&trip, start, offset);
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&schedule)?)?;
    } else {
        write_report(writer, &schedule, offset)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            leg1_miles: 250.0,
            leg1_hours: 4.5,
            leg2_miles: 300.0,
            leg2_hours: 5.5,
            cycle_used: 0.0,
            current: None,
            pickup: None,
            dropoff: None,
            start: Some("2025-03-10T08:00:00Z".to_string()),
            json: true,
        }
    }

    #[test]
    fn simulate_prints_json_schedule() {
        let mut out = Vec::new();
        run(&mut out, &args(), &Config::default()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["events"].as_array().unwrap().len(), 4);
        assert_eq!(value["summary"]["total_distance_miles"], 550.0);
        assert_eq!(value["daily_logs"][0]["date"], "2025-03-10");
    }

    #[test]
    fn simulate_rejects_invalid_inputs() {
        let mut out = Vec::new();

        let bad_leg = SimulateArgs {
            leg1_hours: 0.0,
            ..args()
        };
        let err = run(&mut out, &bad_leg, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("leg 1"));

        let bad_cycle = SimulateArgs {
            cycle_used: 70.0,
            ..args()
        };
        assert!(run(&mut out, &bad_cycle, &Config::default()).is_err());
        assert!(out.is_empty());
    }
}
