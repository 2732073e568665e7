//! Nearest command implementation for the UniRoute CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use uniroute_core::{
    Coordinate, CurrentUser, RoutingEngine, StopId, StopSource, StopTime, format_distance,
    format_walking_time,
};
use uniroute_data::{
    FileStopSource, FixedGeolocator, HttpRoutingEngine, HttpRoutingEngineConfig, HttpStopSource,
    HttpStopSourceConfig,
};
use uniroute_session::{LocationSession, ReconcilerConfig, SessionConfig, SessionSnapshot};

use crate::{
    ARG_NEAREST_LATITUDE, ARG_NEAREST_LONGITUDE, ARG_NEAREST_OSRM_BASE_URL,
    ARG_NEAREST_ROUTE_TIMEOUT, ARG_NEAREST_STOP, ARG_NEAREST_STOPS_FILE, ARG_NEAREST_STOPS_TOKEN,
    ARG_NEAREST_STOPS_URL, ARG_NEAREST_WITH_TIMES, CliError, ENV_NEAREST_LATITUDE,
    ENV_NEAREST_LONGITUDE,
};

/// CLI arguments for the `nearest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the stop list, place the user, resolve the target stop \
                 and wait for a walking route from the OSRM instance. The \
                 resulting session snapshot is printed as JSON.",
    about = "Find the walking route to the nearest or chosen stop"
)]
#[ortho_config(prefix = "UNIROUTE")]
pub(crate) struct NearestArgs {
    /// JSON file holding the stop list.
    #[arg(long = ARG_NEAREST_STOPS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) stops_file: Option<Utf8PathBuf>,
    /// Base URL of the stop API (e.g. "http://localhost:5090").
    #[arg(long = ARG_NEAREST_STOPS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) stops_url: Option<String>,
    /// Bearer token sent to the stop API.
    #[arg(long = ARG_NEAREST_STOPS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) stops_token: Option<String>,
    /// Latitude of the user in decimal degrees.
    #[arg(long = ARG_NEAREST_LATITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the user in decimal degrees.
    #[arg(long = ARG_NEAREST_LONGITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Pin this stop instead of the nearest one.
    #[arg(long = ARG_NEAREST_STOP, value_name = "id")]
    #[serde(default)]
    pub(crate) stop: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_NEAREST_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Seconds to wait for a routed estimate.
    #[arg(long = ARG_NEAREST_ROUTE_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) route_timeout_secs: Option<u64>,
    /// Also print upcoming arrivals at the resolved stop.
    #[arg(long = ARG_NEAREST_WITH_TIMES)]
    #[serde(default)]
    pub(crate) with_times: bool,
}

impl NearestArgs {
    pub(crate) fn into_config(self) -> Result<NearestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearestConfig::try_from(merged)
    }
}

/// Where the stop list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StopInput {
    /// A JSON file on disk.
    File(Utf8PathBuf),
    /// The HTTP stop API.
    Http {
        base_url: String,
        token: Option<String>,
    },
}

/// Resolved `nearest` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearestConfig {
    pub(crate) stops: StopInput,
    pub(crate) location: Option<Coordinate>,
    pub(crate) stop: Option<StopId>,
    pub(crate) osrm_base_url: String,
    pub(crate) route_timeout: Duration,
    pub(crate) with_times: bool,
}

impl TryFrom<NearestArgs> for NearestConfig {
    type Error = CliError;

    fn try_from(args: NearestArgs) -> Result<Self, Self::Error> {
        let stops = match (args.stops_file, args.stops_url) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_NEAREST_STOPS_FILE,
                    second: ARG_NEAREST_STOPS_URL,
                });
            }
            (Some(path), None) => StopInput::File(path),
            (None, url) => StopInput::Http {
                base_url: url.unwrap_or_else(|| HttpStopSourceConfig::default().base_url),
                token: args.stops_token,
            },
        };

        let location = match (args.latitude, args.longitude) {
            (Some(latitude), Some(longitude)) => {
                Some(Coordinate::new(latitude, longitude).map_err(CliError::InvalidLocation)?)
            }
            (Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_NEAREST_LONGITUDE,
                    env: ENV_NEAREST_LONGITUDE,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_NEAREST_LATITUDE,
                    env: ENV_NEAREST_LATITUDE,
                });
            }
            (None, None) => None,
        };

        let default_routing = HttpRoutingEngineConfig::default();
        let route_timeout = args
            .route_timeout_secs
            .map_or(default_routing.timeout, Duration::from_secs);

        Ok(Self {
            stops,
            location,
            stop: args.stop.map(StopId::from),
            osrm_base_url: args.osrm_base_url.unwrap_or(default_routing.base_url),
            route_timeout,
            with_times: args.with_times,
        })
    }
}

/// Builds the collaborators for one `nearest` invocation.
pub(super) trait NearestServices {
    fn routing_engine(&self, config: &NearestConfig) -> Result<Arc<dyn RoutingEngine>, CliError>;

    fn stop_source(&self, config: &NearestConfig) -> Result<Box<dyn StopSource>, CliError>;
}

pub(super) struct DefaultNearestServices;

impl NearestServices for DefaultNearestServices {
    fn routing_engine(&self, config: &NearestConfig) -> Result<Arc<dyn RoutingEngine>, CliError> {
        let engine_config = HttpRoutingEngineConfig::new(config.osrm_base_url.clone())
            .with_timeout(config.route_timeout);
        let engine = HttpRoutingEngine::with_config(engine_config).map_err(|source| {
            CliError::BuildRoutingEngine {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(engine))
    }

    fn stop_source(&self, config: &NearestConfig) -> Result<Box<dyn StopSource>, CliError> {
        match &config.stops {
            StopInput::File(path) => Ok(Box::new(FileStopSource::new(path.clone()))),
            StopInput::Http { base_url, token } => {
                let mut source_config = HttpStopSourceConfig::new(base_url.clone());
                if let Some(bearer) = token {
                    source_config = source_config.with_bearer_token(bearer.clone());
                }
                let source = HttpStopSource::with_config(source_config).map_err(|source| {
                    CliError::BuildStopSource {
                        base_url: base_url.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(source))
            }
        }
    }
}

/// JSON document printed by the `nearest` command.
#[derive(Debug, Serialize)]
pub(crate) struct NearestReport {
    #[serde(flatten)]
    pub(crate) snapshot: SessionSnapshot,
    /// Walking distance rendered for display, e.g. `"160m"`.
    pub(crate) distance: Option<String>,
    /// Walking time rendered for display, e.g. `"12 min"`.
    pub(crate) walking_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stop_times: Option<Vec<StopTime>>,
}

pub(super) fn run_nearest(args: NearestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let services = DefaultNearestServices;
    run_nearest_with(args, &services, &mut stdout)
}

pub(super) fn run_nearest_with(
    args: NearestArgs,
    services: &dyn NearestServices,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(execute_nearest(&config, services))?;
    write_report(writer, &report)
}

pub(super) async fn execute_nearest(
    config: &NearestConfig,
    services: &dyn NearestServices,
) -> Result<NearestReport, CliError> {
    let engine = services.routing_engine(config)?;
    let source = services.stop_source(config)?;
    let routing = ReconcilerConfig::default().with_timeout(config.route_timeout);
    let mut session = LocationSession::new(engine, SessionConfig::default().with_routing(routing));

    session.load_stops(source.as_ref()).await;
    let geolocator = FixedGeolocator::from(config.location);
    session
        .initialise(&CurrentUser::default(), &geolocator)
        .await;
    if let Some(stop_id) = &config.stop {
        session.select_stop(stop_id.clone());
    }
    if session.settle().await {
        info!("route settled");
    }

    let snapshot = session.snapshot();
    session.shutdown();
    let stop_times = match (&snapshot.resolved_target, config.with_times) {
        (Some(target), true) => Some(source.stop_times(&target.id).await.map_err(|err| {
            CliError::StopTimes {
                stop_id: target.id.to_string(),
                source: err,
            }
        })?),
        _ => None,
    };
    let summary = snapshot.route_summary.as_ref();
    Ok(NearestReport {
        distance: summary.map(|route| format_distance(route.distance_km)),
        walking_time: summary.map(|route| format_walking_time(route.walking_time_minutes)),
        stop_times,
        snapshot,
    })
}

fn write_report(writer: &mut dyn Write, report: &NearestReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearestConfig, CliError> {
    let merged = NearestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearestConfig::try_from(merged)
}
