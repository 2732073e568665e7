//! Loading stops and their upcoming arrivals.
//!
//! The stop list blocks the whole feature when it cannot be loaded, so
//! [`StopSourceError`] is the one failure the session surfaces to the user.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Stop, StopId};

/// An upcoming arrival at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopTime {
    /// Identifier of the timetable entry.
    pub id: String,
    /// Line serving the stop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_name: Option<String>,
    /// Scheduled arrival, as provided by the source.
    pub arrival_time: String,
    /// Reported delay in minutes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay_minutes: Option<i32>,
}

/// Errors from a [`StopSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopSourceError {
    /// The source could not be reached.
    #[error("network error loading stops from {url}: {message}")]
    Network {
        /// Endpoint that was queried.
        url: String,
        /// Transport error message.
        message: String,
    },
    /// The source failed with a server-side error.
    #[error("stop service at {url} failed with HTTP {status}")]
    Server {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The source refused the request with a client-side error.
    #[error("stop service at {url} rejected the request with HTTP {status}")]
    Client {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The session credentials were rejected.
    #[error("stop service rejected the session credentials")]
    Unauthorized,
    /// The requested resource does not exist.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing resource.
        what: String,
    },
    /// The payload could not be decoded.
    #[error("failed to parse stop data: {message}")]
    Parse {
        /// Decoder error message.
        message: String,
    },
    /// A local stop file could not be read.
    #[error("failed to read stops from {path}: {message}")]
    Io {
        /// File that was read.
        path: String,
        /// IO error message.
        message: String,
    },
}

impl StopSourceError {
    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}

/// Provide the stop list and per-stop arrivals.
#[async_trait]
pub trait StopSource: Send + Sync {
    /// Load every stop. A fresh list replaces any earlier one wholesale.
    async fn list_stops(&self) -> Result<Vec<Stop>, StopSourceError>;

    /// Load upcoming arrivals for `stop_id`.
    async fn stop_times(&self, stop_id: &StopId) -> Result<Vec<StopTime>, StopSourceError>;
}
