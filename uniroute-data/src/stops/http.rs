//! HTTP-backed stop source.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use uniroute_core::{Stop, StopId, StopSource, StopSourceError, StopTime};

use super::dto::{decode_stop_times, decode_stops};
use crate::client::{ProviderBuildError, build_client, join_url};

/// Default user agent for stop API requests.
pub const DEFAULT_USER_AGENT: &str = "uniroute-stops/0.1";

const STOPS_PATH: &str = "/api/bus-stops";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for [`HttpStopSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStopSourceConfig {
    /// Base URL of the stop API (e.g., `"http://localhost:5090"`).
    pub base_url: String,
    /// Bearer token sent with every request, when present.
    pub bearer_token: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpStopSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5090".to_string(),
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpStopSourceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Authenticate requests with `token`.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
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

/// Stop source reading the stop API.
#[derive(Debug, Clone)]
pub struct HttpStopSource {
    client: Client,
    config: HttpStopSourceConfig,
}

impl HttpStopSource {
    /// Create a source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpStopSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpStopSourceConfig) -> Result<Self, ProviderBuildError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    fn stops_url(&self) -> String {
        join_url(&self.config.base_url, STOPS_PATH)
    }

    fn stop_times_url(&self, stop_id: &StopId) -> String {
        let segment = urlencoding::encode(stop_id.as_str());
        join_url(
            &self.config.base_url,
            &format!("{STOPS_PATH}/{segment}/stop-times"),
        )
    }

    async fn fetch(&self, url: &str, what: &str) -> Result<String, StopSourceError> {
        debug!("fetching {what} from {url}");
        let mut request = self.client.get(url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| network_error(&err, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, url, what));
        }

        response.text().await.map_err(|err| network_error(&err, url))
    }
}

#[async_trait]
impl StopSource for HttpStopSource {
    async fn list_stops(&self) -> Result<Vec<Stop>, StopSourceError> {
        let url = self.stops_url();
        let body = self.fetch(&url, "stop list").await?;
        let stops: Vec<Stop> = decode_stops(&body)?
            .into_iter()
            .map(|entry| entry.stop)
            .collect();
        debug!("loaded {} stops from {url}", stops.len());
        Ok(stops)
    }

    async fn stop_times(&self, stop_id: &StopId) -> Result<Vec<StopTime>, StopSourceError> {
        let url = self.stop_times_url(stop_id);
        let body = self.fetch(&url, &format!("stop times for stop {stop_id}")).await?;
        decode_stop_times(&body)
    }
}

fn network_error(error: &reqwest::Error, url: &str) -> StopSourceError {
    StopSourceError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Map a non-success HTTP status onto the stop error taxonomy.
fn status_error(status: StatusCode, url: &str, what: &str) -> StopSourceError {
    match status {
        StatusCode::UNAUTHORIZED => StopSourceError::Unauthorized,
        StatusCode::NOT_FOUND => StopSourceError::NotFound {
            what: what.to_owned(),
        },
        other if other.is_server_error() => StopSourceError::Server {
            url: url.to_owned(),
            status: other.as_u16(),
        },
        other => StopSourceError::Client {
            url: url.to_owned(),
            status: other.as_u16(),
        },
    }
}
