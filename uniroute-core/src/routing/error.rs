use thiserror::Error;

/// Errors from [`crate::routing::RoutingEngine::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The engine found no walkable path between the points.
    #[error("no route found: {message}")]
    NoRoute {
        /// Explanation returned by the engine.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("routing request to {target} timed out after {timeout_ms} ms")]
    Timeout {
        /// Endpoint or stop the request was for.
        target: String,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },
    /// The engine could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Endpoint that was queried.
        url: String,
        /// Transport error message.
        message: String,
    },
    /// The engine answered with a non-success HTTP status.
    #[error("routing service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
    /// The engine rejected the request with a service-level error code.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Engine status code.
        code: String,
        /// Engine message.
        message: String,
    },
    /// The engine response could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder error message.
        message: String,
    },
}

impl RoutingError {
    /// Whether the failure was a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
