//! Great-circle distance between coordinates.
//!
//! No range validation happens here; callers construct coordinates through
//! [`Coordinate::new`](crate::Coordinate::new) when the input is untrusted.

use crate::Coordinate;

/// Mean Earth radius used by [`distance_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between `a` and `b` in kilometres.
///
/// The function is symmetric and returns exactly `0.0` for identical inputs.
///
/// # Examples
/// ```
/// use uniroute_core::{Coordinate, distance_km};
///
/// let here = Coordinate { latitude: -23.561, longitude: -46.656 };
/// let stop = Coordinate { latitude: -23.560, longitude: -46.655 };
/// let km = distance_km(here, stop);
/// assert!((km - 0.151).abs() < 0.001);
/// assert_eq!(distance_km(here, here), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point maths"
)]
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    // Rounding can push the haversine fractionally past 1 for antipodal points.
    let h = ((delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * central_angle
}
