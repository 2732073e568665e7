//! HTTP client construction shared by the network adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Failure to construct a network adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The underlying HTTP client rejected its configuration.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Build a client that bounds both connection setup and the whole request.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Join `path` onto `base_url`, tolerating a trailing slash on the base.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}
