//! Device geolocation queries.
//!
//! A [`Geolocator`] reports the device position. Implementations may cache a
//! recent fix; [`GeolocationRequest::maximum_age`] bounds how stale that fix
//! may be. The session applies [`GeolocationRequest::timeout`] itself so a
//! geolocator that never answers still resolves to
//! [`GeolocationError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// Default time allowed for a position fix.
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default age of a cached fix that may be reused.
pub const DEFAULT_GEOLOCATION_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Parameters for a position query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationRequest {
    /// Upper bound on how long the query may take.
    pub timeout: Duration,
    /// Oldest cached fix the geolocator may return.
    pub maximum_age: Duration,
}

impl Default for GeolocationRequest {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            maximum_age: DEFAULT_GEOLOCATION_MAX_AGE,
        }
    }
}

/// Errors from [`Geolocator::current_location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user refused access to their location.
    #[error("permission to access the location was denied")]
    PermissionDenied,
    /// No position source is available.
    #[error("location is not available")]
    Unavailable,
    /// No fix arrived before the timeout.
    #[error("timed out waiting for a location fix")]
    Timeout,
}

/// Report the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Return the current position honouring `request`.
    async fn current_location(
        &self,
        request: GeolocationRequest,
    ) -> Result<Coordinate, GeolocationError>;
}
