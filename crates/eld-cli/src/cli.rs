//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::batch::BatchArgs;
use crate::commands::plan::PlanArgs;
use crate::commands::simulate::SimulateArgs;

/// Hours-of-service trip planner.
///
/// Lays out a two-leg truck trip as driving, rest, break, fuel, pickup and
/// dropoff events that respect the property-carrying HOS limits, and prints
/// the resulting daily log sheets.
#[derive(Debug, Parser)]
#[command(name = "eld", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a trip between three addresses using online geocoding and routing.
    Plan(PlanArgs),

    /// Plan a trip from known leg distances and durations.
    Simulate(SimulateArgs),

    /// Plan every trip in a JSON file.
    Batch(BatchArgs),
}
