//! Plan many trips from a JSON file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use eld_core::{TripInput, plan_batch};

use crate::Config;
use crate::commands::util::{log_offset, resolve_start};

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON file holding an array of trip inputs.
    pub file: PathBuf,

    /// Start time shared by every trip (RFC 3339 or relative).
    #[arg(long)]
    pub start: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &BatchArgs, config: &Config) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let trips: Vec<TripInput> = serde_json::from_str(&content)
        .with_context(|| format!("invalid trip inputs in {}", args.file.display()))?;

    let start = resolve_start(args.start.as_deref(), config)?;
    let offset = log_offset(config)?;
    tracing::debug!(trips = trips.len(), %start, "planning batch");

    let schedules = plan_batch(&trips, start, offset);
    writeln!(writer, "{}", serde_json::to_string_pretty(&schedules)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIPS: &str = r#"[
        {
            "to_pickup": {"distance_miles": 250.0, "duration_hours": 4.5},
            "to_dropoff": {"distance_miles": 300.0, "duration_hours": 5.5},
            "waypoints": {
                "current": {"lat": 41.88, "lon": -87.63},
                "pickup": {"lat": 38.63, "lon": -90.2},
                "dropoff": {"lat": 32.78, "lon": -96.8}
            }
        },
        {
            "to_pickup": {"distance_miles": 600.0, "duration_hours": 10.0},
            "to_dropoff": {"distance_miles": 300.0, "duration_hours": 5.0},
            "cycle_used_hours": 69.5,
            "waypoints": {
                "current": {"lat": 41.88, "lon": -87.63},
                "pickup": {"lat": 38.63, "lon": -90.2},
                "dropoff": {"lat": 32.78, "lon": -96.8}
            }
        }
    ]"#;

    fn batch_args(file: PathBuf) -> BatchArgs {
        BatchArgs {
            file,
            start: Some("2025-03-10T08:00:00Z".to_string()),
        }
    }

    #[test]
    fn batch_plans_each_trip_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trips.json");
        std::fs::write(&path, TRIPS).unwrap();

        let mut out = Vec::new();
        run(&mut out, &batch_args(path), &Config::default()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let schedules = value.as_array().unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0]["events"].as_array().unwrap().len(), 4);
        assert_eq!(schedules[1]["events"][0]["label"], "34-Hour Restart");
    }

    #[test]
    fn batch_rejects_invalid_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trips.json");
        std::fs::write(
            &path,
            TRIPS.replacen("\"duration_hours\": 4.5", "\"duration_hours\": -1", 1),
        )
        .unwrap();

        let mut out = Vec::new();
        let err = run(&mut out, &batch_args(path), &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("invalid trip inputs"));
        assert!(out.is_empty());
    }

    #[test]
    fn batch_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run(
            &mut out,
            &batch_args(temp.path().join("nope.json")),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
