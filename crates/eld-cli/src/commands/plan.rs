//! Plan a trip between three addresses: geocode, route, simulate.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use eld_core::hos::CYCLE_LIMIT_HOURS;
use eld_core::{Schedule, TripInput, Waypoints};
use eld_geo::{GeoClient, Location, Route};
use serde::Serialize;

use crate::Config;
use crate::commands::render::write_report;
use crate::commands::util::{log_offset, resolve_start};

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Where the driver is now.
    #[arg(long)]
    pub from: String,

    /// Pickup address.
    #[arg(long)]
    pub pickup: String,

    /// Dropoff address.
    #[arg(long)]
    pub dropoff: String,

    /// Hours already used in the current 70-hour/8-day cycle.
    #[arg(long, default_value_t = 0.0)]
    pub cycle_used: f64,

    /// Trip start (RFC 3339 or relative, e.g. "in 2 hours"). Defaults to the
    /// configured hour tomorrow.
    #[arg(long)]
    pub start: Option<String>,

    /// Print the full plan as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Locations {
    pub current: Location,
    pub pickup: Location,
    pub dropoff: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct Routes {
    pub to_pickup: Route,
    pub to_dropoff: Route,
}

/// Everything a planned trip reports.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub locations: Locations,
    pub routes: Routes,
    #[serde(flatten)]
    pub schedule: Schedule,
}

pub fn run<W: Write>(writer: &mut W, args: &PlanArgs, config: &Config) -> Result<()> {
    if !(0.0..CYCLE_LIMIT_HOURS).contains(&args.cycle_used) {
        bail!(
            "--cycle-used must be between 0 and {CYCLE_LIMIT_HOURS}, got {}",
            args.cycle_used
        );
    }
    let start = resolve_start(args.start.as_deref(), config)?;
    let offset = log_offset(config)?;

    let client = GeoClient::new(config.geo_settings()).context("failed to create geo client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let (locations, routes) =
        runtime.block_on(resolve_trip(&client, args, config.geocode_delay()))?;

    let plan = build_plan(locations, routes, args.cycle_used, start, offset)?;
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&plan)?)?;
    } else {
        write_plan(writer, &plan, offset)?;
    }
    Ok(())
}

async fn resolve_trip(
    client: &GeoClient,
    args: &PlanArgs,
    delay: Duration,
) -> Result<(Locations, Routes)> {
    let addresses = [args.from.as_str(), args.pickup.as_str(), args.dropoff.as_str()];
    let mut found = client
        .geocode_all(&addresses, delay)
        .await
        .context("geocoding failed")?
        .into_iter();
    let (Some(current), Some(pickup), Some(dropoff)) = (found.next(), found.next(), found.next())
    else {
        bail!("geocoder returned fewer locations than requested");
    };

    let waypoints = waypoints(&current, &pickup, &dropoff)?;
    let to_pickup = client
        .route(waypoints.current, waypoints.pickup)
        .await
        .context("routing to pickup failed")?;
    let to_dropoff = client
        .route(waypoints.pickup, waypoints.dropoff)
        .await
        .context("routing to dropoff failed")?;

    Ok((
        Locations {
            current,
            pickup,
            dropoff,
        },
        Routes {
            to_pickup,
            to_dropoff,
        },
    ))
}

fn waypoints(current: &Location, pickup: &Location, dropoff: &Location) -> Result<Waypoints> {
    Ok(Waypoints {
        current: current
            .coordinate()
            .with_context(|| format!("bad coordinate for {}", current.display_name))?,
        pickup: pickup
            .coordinate()
            .with_context(|| format!("bad coordinate for {}", pickup.display_name))?,
        dropoff: dropoff
            .coordinate()
            .with_context(|| format!("bad coordinate for {}", dropoff.display_name))?,
    })
}

/// Validates resolved locations and routes into a trip and schedules it.
pub fn build_plan(
    locations: Locations,
    routes: Routes,
    cycle_used: f64,
    start: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<TripPlan> {
    let waypoints = waypoints(&locations.current, &locations.pickup, &locations.dropoff)?;
    let to_pickup = routes.to_pickup.leg().context("unusable route to pickup")?;
    let to_dropoff = routes
        .to_dropoff
        .leg()
        .context("unusable route to dropoff")?;
    let trip = TripInput::new(to_pickup, to_dropoff, cycle_used, waypoints)
        .context("invalid trip input")?;

    Ok(TripPlan {
        locations,
        routes,
        schedule: Schedule::compute(&trip, start, offset),
    })
}

fn write_plan<W: Write>(writer: &mut W, plan: &TripPlan, offset: FixedOffset) -> Result<()> {
    let locations = &plan.locations;
    writeln!(writer, "FROM     {}", locations.current.display_name)?;
    writeln!(
        writer,
        "PICKUP   {} ({:.1} mi)",
        locations.pickup.display_name, plan.routes.to_pickup.distance_miles
    )?;
    writeln!(
        writer,
        "DROPOFF  {} ({:.1} mi)",
        locations.dropoff.display_name, plan.routes.to_dropoff.distance_miles
    )?;
    writeln!(writer)?;
    write_report(writer, &plan.schedule, offset)?;
    Ok(())
}
