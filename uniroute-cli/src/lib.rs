//! Command-line interface for the UniRoute location core.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod nearest;

pub use error::CliError;

use nearest::{NearestArgs, run_nearest};

const ARG_NEAREST_STOPS_FILE: &str = "stops-file";
const ARG_NEAREST_STOPS_URL: &str = "stops-url";
const ARG_NEAREST_STOPS_TOKEN: &str = "stops-token";
const ARG_NEAREST_LATITUDE: &str = "latitude";
const ARG_NEAREST_LONGITUDE: &str = "longitude";
const ARG_NEAREST_STOP: &str = "stop";
const ARG_NEAREST_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_NEAREST_ROUTE_TIMEOUT: &str = "route-timeout-secs";
const ARG_NEAREST_WITH_TIMES: &str = "with-times";
const ENV_NEAREST_LATITUDE: &str = "UNIROUTE_CMDS_NEAREST_LATITUDE";
const ENV_NEAREST_LONGITUDE: &str = "UNIROUTE_CMDS_NEAREST_LONGITUDE";

/// Run the UniRoute CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Nearest(args) => run_nearest(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "uniroute",
    about = "Walking routes from the commuter's position to the nearest stop",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the target stop and the walking route to it.
    Nearest(NearestArgs),
}

#[cfg(test)]
mod tests;
