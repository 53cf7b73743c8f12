//! End-to-end tests of the `eld` binary for the offline commands.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn eld_binary() -> String {
    env!("CARGO_BIN_EXE_eld").to_string()
}

/// Runs `eld` with an isolated home directory and no ambient configuration.
fn eld(home: &Path, args: &[&str]) -> Output {
    Command::new(eld_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("ELD_LOG_UTC_OFFSET_MINUTES")
        .env_remove("ELD_START_HOUR")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run eld")
}

const SHORT_TRIP: &[&str] = &[
    "simulate",
    "--leg1-miles",
    "250",
    "--leg1-hours",
    "4.5",
    "--leg2-miles",
    "300",
    "--leg2-hours",
    "5.5",
    "--start",
    "2025-03-10T08:00:00Z",
];

fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "eld should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_simulate_json_short_trip() {
    let temp = TempDir::new().unwrap();
    let mut args = SHORT_TRIP.to_vec();
    args.push("--json");

    let plan = json_stdout(&eld(temp.path(), &args));
    let kinds: Vec<&str> = plan["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["driving", "pickup", "driving", "dropoff"]);
    assert_eq!(plan["summary"]["total_distance_miles"], 550.0);
    assert_eq!(plan["events"][3]["end"], "2025-03-10T20:00:00Z");

    let logs = plan["daily_logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["totals"]["off_duty"], 12.0);
}

#[test]
fn test_simulate_text_report() {
    let temp = TempDir::new().unwrap();
    let output = eld(temp.path(), SHORT_TRIP);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("TRIP PLAN\n"));
    assert!(stdout.contains("LOG 2025-03-10  OFF 12.00  SB 0.00  D 10.00  ON 2.00"));
}

#[test]
fn test_verbose_logs_stay_off_stdout() {
    let temp = TempDir::new().unwrap();
    let mut args = SHORT_TRIP.to_vec();
    args.extend(["--json", "--verbose"]);

    let output = eld(temp.path(), &args);
    let plan = json_stdout(&output);
    assert!(plan["events"].is_array());
    assert!(String::from_utf8_lossy(&output.stderr).contains("trip planned"));
}

#[test]
fn test_config_file_sets_log_offset() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("eld.toml");
    std::fs::write(&config_path, "log_utc_offset_minutes = -360\n").unwrap();

    let mut args = vec!["--config", config_path.to_str().unwrap()];
    args.extend_from_slice(SHORT_TRIP);
    args.push("--json");

    let plan = json_stdout(&eld(temp.path(), &args));
    let segments = plan["daily_logs"][0]["segments"].as_array().unwrap();
    assert_eq!(segments[0]["end_hour"], 2.0);
    assert_eq!(segments[1]["status"], "D");
}

#[test]
fn test_simulate_restart_when_cycle_nearly_spent() {
    let temp = TempDir::new().unwrap();
    let mut args = SHORT_TRIP.to_vec();
    args.extend(["--cycle-used", "69.5", "--json"]);

    let plan = json_stdout(&eld(temp.path(), &args));
    assert_eq!(plan["events"][0]["label"], "34-Hour Restart");
    assert_eq!(plan["events"][0]["duration_hours"], 34.0);
    assert_eq!(plan["summary"]["total_days"], 3);
}

#[test]
fn test_simulate_rejects_out_of_range_cycle() {
    let temp = TempDir::new().unwrap();
    let mut args = SHORT_TRIP.to_vec();
    args.extend(["--cycle-used", "70"]);

    let output = eld(temp.path(), &args);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cycle hours used"));
}

#[test]
fn test_batch_round_trip() {
    let temp = TempDir::new().unwrap();
    let trips = temp.path().join("trips.json");
    std::fs::write(
        &trips,
        r#"[{
            "to_pickup": {"distance_miles": 250.0, "duration_hours": 4.5},
            "to_dropoff": {"distance_miles": 300.0, "duration_hours": 5.5},
            "waypoints": {
                "current": {"lat": 41.88, "lon": -87.63},
                "pickup": {"lat": 38.63, "lon": -90.2},
                "dropoff": {"lat": 32.78, "lon": -96.8}
            }
        }]"#,
    )
    .unwrap();

    let output = eld(
        temp.path(),
        &[
            "batch",
            trips.to_str().unwrap(),
            "--start",
            "2025-03-10T08:00:00Z",
        ],
    );
    let schedules = json_stdout(&output);
    assert_eq!(schedules.as_array().unwrap().len(), 1);
    assert_eq!(schedules[0]["events"][1]["position"]["lat"], 38.63);
}

#[test]
fn test_plan_rejects_empty_address_before_network() {
    let temp = TempDir::new().unwrap();
    let output = eld(
        temp.path(),
        &[
            "plan",
            "--from",
            "  ",
            "--pickup",
            "St. Louis",
            "--dropoff",
            "Dallas",
            "--start",
            "2025-03-10T08:00:00Z",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("address cannot be empty"));
}
