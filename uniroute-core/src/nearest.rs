//! Select the stop closest to a location by straight-line distance.

use crate::{Stop, UserLocation, distance_km};

/// The closest stop and its haversine distance from the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStop<'a> {
    /// Borrowed stop from the input slice.
    pub stop: &'a Stop,
    /// Straight-line distance in kilometres.
    pub distance_km: f64,
}

/// Return the stop minimising [`distance_km`] from `location`.
///
/// Returns `None` when the location is absent or `stops` is empty. Exact ties
/// resolve to the stop that appears first in `stops`.
///
/// # Examples
/// ```
/// use uniroute_core::{Coordinate, LocationSource, Stop, UserLocation, find_closest};
///
/// let here = UserLocation::new(
///     Coordinate { latitude: -23.561, longitude: -46.656 },
///     LocationSource::DeviceGeolocation,
/// );
/// let stops = vec![
///     Stop::new(1_u64, Coordinate { latitude: -23.560, longitude: -46.655 }),
///     Stop::new(2_u64, Coordinate { latitude: -23.600, longitude: -46.700 }),
/// ];
/// let nearest = find_closest(Some(&here), &stops).expect("a stop");
/// assert_eq!(nearest.stop.id, 1_u64.into());
/// ```
#[must_use]
pub fn find_closest<'a>(
    location: Option<&UserLocation>,
    stops: &'a [Stop],
) -> Option<NearestStop<'a>> {
    let origin = location?.coordinate;
    stops
        .iter()
        .map(|stop| NearestStop {
            stop,
            distance_km: distance_km(origin, stop.coordinate),
        })
        .fold(None, |best, candidate| match best {
            Some(current) if current.distance_km <= candidate.distance_km => Some(current),
            _ => Some(candidate),
        })
}
