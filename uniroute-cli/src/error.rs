//! Error types emitted by the UniRoute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use uniroute_core::{CoordinateError, StopSourceError};
use uniroute_data::ProviderBuildError;

/// Errors emitted by the UniRoute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Two options that exclude each other were both given.
    #[error("--{first} and --{second} cannot be used together")]
    ConflictingArguments {
        first: &'static str,
        second: &'static str,
    },
    /// The latitude/longitude pair is not a valid position.
    #[error("invalid location: {0}")]
    InvalidLocation(#[source] CoordinateError),
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing the routing engine client failed.
    #[error("failed to build routing engine for {base_url:?}: {source}")]
    BuildRoutingEngine {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the stop API client failed.
    #[error("failed to build stop source for {base_url:?}: {source}")]
    BuildStopSource {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Loading the arrivals of the resolved stop failed.
    #[error("failed to load arrivals for stop {stop_id}: {source}")]
    StopTimes {
        stop_id: String,
        #[source]
        source: StopSourceError,
    },
    /// Serialising the report failed.
    #[error("failed to serialise nearest stop report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
