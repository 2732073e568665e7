//! HTTP-based `RoutingEngine` using OSRM's Route API.
//!
//! [`HttpRoutingEngine`] asks an OSRM instance for the best path between two
//! coordinates and maps every transport, status and payload failure onto
//! [`RoutingError`]. The engine is fully async; the caller decides how long
//! to wait by configuring [`HttpRoutingEngineConfig::timeout`].
//!
//! # Example
//!
//! ```no_run
//! use uniroute_core::{Coordinate, RoutingEngine};
//! use uniroute_data::routing::HttpRoutingEngine;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = HttpRoutingEngine::new("http://localhost:5000")?;
//! let path = engine
//!     .route(
//!         Coordinate { latitude: -23.561, longitude: -46.656 },
//!         Coordinate { latitude: -23.560, longitude: -46.655 },
//!     )
//!     .await?;
//! println!("{} m", path.distance_meters);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::{Client, StatusCode};
use uniroute_core::{Coordinate, RoutedPath, RoutingEngine, RoutingError};

use super::osrm::{NO_ROUTE, RouteResponse};
use crate::client::{ProviderBuildError, build_client, join_url};

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "uniroute-routing/0.1";

/// Default OSRM profile for pedestrian routing.
pub const DEFAULT_PROFILE: &str = "foot";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`HttpRoutingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoutingEngineConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment of the request path.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRoutingEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpRoutingEngineConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the OSRM profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Pedestrian routing engine backed by an OSRM Route service.
#[derive(Debug, Clone)]
pub struct HttpRoutingEngine {
    client: Client,
    config: HttpRoutingEngineConfig,
}

impl HttpRoutingEngine {
    /// Create a new engine with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRoutingEngineConfig::new(base_url))
    }

    /// Create a new engine with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpRoutingEngineConfig) -> Result<Self, ProviderBuildError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpRoutingEngineConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for a pair of coordinates.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`.
    fn build_route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        let from = Coord::from(origin);
        let to = Coord::from(destination);
        join_url(
            &self.config.base_url,
            &format!(
                "/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
                self.config.profile, from.x, from.y, to.x, to.y
            ),
        )
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                target: url.to_owned(),
                timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        if let Some(status) = error.status() {
            return RoutingError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoutingError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert an OSRM response to a `RoutedPath`.
    fn convert_response(response: RouteResponse) -> Result<RoutedPath, RoutingError> {
        if !response.is_ok() {
            let message = response.message.unwrap_or_default();
            return Err(if response.code == NO_ROUTE {
                RoutingError::NoRoute { message }
            } else {
                RoutingError::Service {
                    code: response.code,
                    message,
                }
            });
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoute {
                message: "OSRM response contained no routes".to_string(),
            })?;

        if !route.distance.is_finite() || route.distance < 0.0 {
            return Err(RoutingError::Parse {
                message: format!("invalid route distance {}", route.distance),
            });
        }

        let path = route
            .geometry
            .map(|line| {
                line.coordinates
                    .into_iter()
                    .map(|[x, y]| Coordinate::from(Coord { x, y }))
                    .collect()
            })
            .unwrap_or_default();

        Ok(RoutedPath {
            distance_meters: route.distance,
            path,
        })
    }
}

#[async_trait]
impl RoutingEngine for HttpRoutingEngine {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        let url = self.build_route_url(origin, destination);
        debug!("requesting walking route from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // OSRM reports `NoRoute` and `InvalidQuery` with a 400 status and a
        // JSON body, so the body is decoded before the status is checked.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => Self::convert_response(parsed),
            Err(_) if !status.is_success() => Err(http_error(&url, status, &body)),
            Err(err) => Err(RoutingError::Parse {
                message: err.to_string(),
            }),
        }
    }
}

fn http_error(url: &str, status: StatusCode, body: &str) -> RoutingError {
    RoutingError::Http {
        url: url.to_owned(),
        status: status.as_u16(),
        message: body.trim().to_owned(),
    }
}
