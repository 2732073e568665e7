//! WGS84 coordinates.

use geo::Coord;
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`. Use
/// [`Coordinate::new`] for values from untrusted sources; the fields are public
/// so trusted callers and tests can build literals directly.
///
/// # Examples
/// ```
/// use uniroute_core::Coordinate;
///
/// # fn main() -> Result<(), uniroute_core::CoordinateError> {
/// let paulista = Coordinate::new(-23.561, -46.656)?;
/// assert_eq!(paulista.latitude, -23.561);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinate {
    /// Validate and construct a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::Latitude`] or [`CoordinateError::Longitude`]
    /// when the value is non-finite or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// `geo` stores planar coordinates as `x = longitude`, `y = latitude`.
impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Self {
            latitude: value.y,
            longitude: value.x,
        }
    }
}
