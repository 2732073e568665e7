//! Geolocation for hosts without a positioning device.
//!
//! Command-line and server hosts learn the position from configuration; a
//! [`FixedGeolocator`] reports that position, or reports
//! [`GeolocationError::Unavailable`] when none was configured.

use async_trait::async_trait;
use uniroute_core::{Coordinate, GeolocationError, GeolocationRequest, Geolocator};

/// Geolocator reporting a configured position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinate>,
}

impl FixedGeolocator {
    /// Report `position` on every query.
    #[must_use]
    pub const fn at(position: Coordinate) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Report that no position is available.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { position: None }
    }
}

impl From<Option<Coordinate>> for FixedGeolocator {
    fn from(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_location(
        &self,
        _request: GeolocationRequest,
    ) -> Result<Coordinate, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}
