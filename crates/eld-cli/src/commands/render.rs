//! Human-readable trip report.

use std::io::{self, Write};

use chrono::{DateTime, FixedOffset, Utc};
use eld_core::{DailyLog, DutyEventKind, Schedule};

pub fn write_report<W: Write>(
    writer: &mut W,
    schedule: &Schedule,
    offset: FixedOffset,
) -> io::Result<()> {
    let summary = &schedule.summary;
    writeln!(writer, "TRIP PLAN")?;
    writeln!(writer, "─────────")?;
    writeln!(writer, "  Distance:  {:.2} mi", summary.total_distance_miles)?;
    writeln!(writer, "  Driving:   {:.2} h", summary.total_driving_hours)?;
    writeln!(writer, "  Rest:      {:.2} h", summary.total_rest_hours)?;
    writeln!(writer, "  On duty:   {:.2} h", summary.total_on_duty_hours)?;
    writeln!(writer, "  Days:      {}", summary.total_days)?;
    if let (Some(start), Some(end)) = (summary.trip_start, summary.trip_end) {
        writeln!(writer, "  Start:     {}", format_instant(start, offset))?;
        writeln!(writer, "  End:       {}", format_instant(end, offset))?;
    }

    writeln!(writer)?;
    writeln!(writer, "EVENTS")?;
    writeln!(writer, "──────")?;
    if schedule.events.is_empty() {
        writeln!(writer, "(no events)")?;
    }
    for event in &schedule.events {
        let miles = if event.kind == DutyEventKind::Driving {
            format!("{:.1} mi", event.miles)
        } else {
            String::new()
        };
        writeln!(
            writer,
            "  {}  {}  {:>6.2} h  {:>10}  {}",
            format_clock(event.start, offset),
            format_clock(event.end, offset),
            event.duration_hours,
            miles,
            event.label
        )?;
    }

    for log in &schedule.daily_logs {
        writeln!(writer)?;
        write_daily_log(writer, log)?;
    }
    Ok(())
}

fn write_daily_log<W: Write>(writer: &mut W, log: &DailyLog) -> io::Result<()> {
    let totals = &log.totals;
    writeln!(
        writer,
        "LOG {}  OFF {:.2}  SB {:.2}  D {:.2}  ON {:.2}",
        log.date, totals.off_duty, totals.sleeper, totals.driving, totals.on_duty
    )?;
    for segment in &log.segments {
        writeln!(
            writer,
            "  {}-{}  {:<3}  {}",
            hour_of_day(segment.start_hour),
            hour_of_day(segment.end_hour),
            segment.status.code(),
            segment.label
        )?;
    }
    Ok(())
}

fn format_clock(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

fn format_instant(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M %:z")
        .to_string()
}

/// Formats fractional hours since midnight as `HH:MM`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "log hours are within [0, 24]"
)]
fn hour_of_day(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
