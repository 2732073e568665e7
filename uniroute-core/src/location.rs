//! The user's position and the map viewport derived from it.

use crate::Coordinate;

/// Fallback map centre (João Pessoa, PB) shown while no location is known.
pub const DEFAULT_CITY_CENTER: Viewport = Viewport {
    center: Coordinate {
        latitude: -7.1195,
        longitude: -34.8450,
    },
    zoom: 13,
};

/// Zoom level used when the viewport centres on the user.
const USER_LOCATION_ZOOM: u8 = 16;

/// Where a [`UserLocation`] came from.
///
/// An unknown location is modelled as `Option::<UserLocation>::None` rather
/// than as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationSource {
    /// The address stored on the current user record.
    SavedAddress,
    /// A live query to the device's geolocation service.
    DeviceGeolocation,
}

/// The user's position together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserLocation {
    /// Position of the user.
    pub coordinate: Coordinate,
    /// Origin of the position.
    pub source: LocationSource,
}

impl UserLocation {
    /// Pair a coordinate with its source.
    #[must_use]
    pub const fn new(coordinate: Coordinate, source: LocationSource) -> Self {
        Self { coordinate, source }
    }
}

/// Map centre and zoom suggested to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Centre of the map.
    pub center: Coordinate,
    /// Tile zoom level.
    pub zoom: u8,
}

impl Viewport {
    /// Centre on `location`, or fall back to `default` when it is absent.
    ///
    /// # Examples
    /// ```
    /// use uniroute_core::{DEFAULT_CITY_CENTER, Viewport};
    ///
    /// assert_eq!(Viewport::for_location(None, DEFAULT_CITY_CENTER), DEFAULT_CITY_CENTER);
    /// ```
    #[must_use]
    pub fn for_location(location: Option<&UserLocation>, default: Self) -> Self {
        location.map_or(default, |user| Self {
            center: user.coordinate,
            zoom: USER_LOCATION_ZOOM,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        DEFAULT_CITY_CENTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn centres_on_user_when_known() {
        let user = UserLocation::new(
            Coordinate {
                latitude: -23.5,
                longitude: -46.6,
            },
            LocationSource::SavedAddress,
        );
        let viewport = Viewport::for_location(Some(&user), Viewport::default());
        assert_eq!(viewport.center, user.coordinate);
        assert_eq!(viewport.zoom, USER_LOCATION_ZOOM);
    }
}
