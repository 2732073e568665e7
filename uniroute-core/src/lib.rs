//! Core domain types for the UniRoute commuter assistant.
//!
//! The crate holds the value types shared by every other member (coordinates,
//! stops, route summaries), the closed-form distance maths used to pick a
//! default stop, and the traits describing the external collaborators: the
//! pedestrian routing engine, the device geolocation query and the stop
//! source. Constructors return `Result` to surface invalid input early.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod coordinate;
mod format;
pub mod geo_math;
pub mod geolocation;
mod location;
pub mod nearest;
pub mod routing;
mod selection;
mod stop;
pub mod stop_source;
mod summary;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod user;

pub use coordinate::{Coordinate, CoordinateError};
pub use format::{format_distance, format_walking_time};
pub use geo_math::{EARTH_RADIUS_KM, distance_km};
pub use geolocation::{
    DEFAULT_GEOLOCATION_MAX_AGE, DEFAULT_GEOLOCATION_TIMEOUT, GeolocationError, GeolocationRequest,
    Geolocator,
};
pub use location::{DEFAULT_CITY_CENTER, LocationSource, UserLocation, Viewport};
pub use nearest::{NearestStop, find_closest};
pub use routing::{RoutedPath, RoutingEngine, RoutingError};
pub use selection::TargetSelection;
pub use stop::{Stop, StopId};
pub use stop_source::{StopSource, StopSourceError, StopTime};
pub use summary::{
    DEFAULT_WALKING_SPEED_KMH, RouteSummary, SourceKind, walking_time_minutes,
};
pub use user::{CurrentUser, SavedAddress};
