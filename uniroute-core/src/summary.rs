//! Normalised walking route summaries.
//!
//! A [`RouteSummary`] is either derived from a routing engine result
//! ([`SourceKind::Routed`]) or computed immediately from the haversine
//! distance ([`SourceKind::StraightLine`]) while a routed result is pending or
//! after the engine failed.

use crate::{Coordinate, StopId, distance_km};

/// Average urban walking speed assumed for time estimates.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 4.5;

const METRES_PER_KM: f64 = 1000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// How a [`RouteSummary`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourceKind {
    /// Distance along a path returned by the routing engine.
    Routed,
    /// Great-circle distance between origin and stop.
    StraightLine,
}

/// Walking distance and time to a stop.
///
/// # Examples
/// ```
/// use uniroute_core::{DEFAULT_WALKING_SPEED_KMH, RouteSummary, SourceKind, StopId};
///
/// let summary = RouteSummary::routed(StopId::from(1_u64), 900.0, DEFAULT_WALKING_SPEED_KMH);
/// assert_eq!(summary.distance_km, 0.9);
/// assert_eq!(summary.walking_time_minutes, 12);
/// assert_eq!(summary.source_kind, SourceKind::Routed);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Stop the summary describes.
    pub stop_id: StopId,
    /// Walking distance in kilometres, never negative.
    pub distance_km: f64,
    /// Walking time rounded up to whole minutes.
    pub walking_time_minutes: u32,
    /// Provenance of the estimate.
    pub source_kind: SourceKind,
}

impl RouteSummary {
    /// Summarise an engine result measured in metres.
    #[expect(
        clippy::float_arithmetic,
        reason = "unit conversion from metres to kilometres"
    )]
    #[must_use]
    pub fn routed(stop_id: StopId, distance_meters: f64, walking_speed_kmh: f64) -> Self {
        let meters = sanitise(distance_meters);
        Self {
            stop_id,
            distance_km: meters / METRES_PER_KM,
            walking_time_minutes: minutes_for_meters(meters, walking_speed_kmh),
            source_kind: SourceKind::Routed,
        }
    }

    /// Summarise the straight-line distance between `origin` and `destination`.
    #[expect(
        clippy::float_arithmetic,
        reason = "unit conversion from kilometres to metres"
    )]
    #[must_use]
    pub fn straight_line(
        stop_id: StopId,
        origin: Coordinate,
        destination: Coordinate,
        walking_speed_kmh: f64,
    ) -> Self {
        let km = sanitise(distance_km(origin, destination));
        Self {
            stop_id,
            distance_km: km,
            walking_time_minutes: minutes_for_meters(km * METRES_PER_KM, walking_speed_kmh),
            source_kind: SourceKind::StraightLine,
        }
    }
}

/// Walking minutes for `distance_km` at `walking_speed_kmh`, rounded up.
///
/// # Examples
/// ```
/// use uniroute_core::walking_time_minutes;
///
/// assert_eq!(walking_time_minutes(0.9, 4.5), 12);
/// assert_eq!(walking_time_minutes(0.0, 4.5), 0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion from kilometres to metres"
)]
#[must_use]
pub fn walking_time_minutes(distance_km: f64, walking_speed_kmh: f64) -> u32 {
    minutes_for_meters(sanitise(distance_km) * METRES_PER_KM, walking_speed_kmh)
}

/// Computed in metres so whole-metre engine distances divide exactly.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "minutes are clamped to the u32 range before the cast"
)]
fn minutes_for_meters(meters: f64, walking_speed_kmh: f64) -> u32 {
    if walking_speed_kmh <= 0.0 || !walking_speed_kmh.is_finite() {
        return 0;
    }
    let minutes = (meters * MINUTES_PER_HOUR / (walking_speed_kmh * METRES_PER_KM)).ceil();
    minutes.clamp(0.0, f64::from(u32::MAX)) as u32
}

fn sanitise(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
