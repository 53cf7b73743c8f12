//! CLI subcommand implementations.

pub mod batch;
pub mod plan;
pub mod render;
pub mod simulate;
pub mod util;
