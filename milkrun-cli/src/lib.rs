//! Command-line interface for the milkrun route planner.
#![forbid(unsafe_code)]

mod error;
mod plan;

pub use error::CliError;

use clap::{Parser, Subcommand};

/// Run the milkrun CLI with the current process arguments.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, input loading, or any
/// stage of the planning pipeline fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "milkrun",
    about = "Plan the cheapest single-vehicle route through a list of stops",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route over stops listed in a CSV file.
    Plan(plan::PlanArgs),
}
