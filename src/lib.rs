//! Facade crate for the UniRoute commuter assistant.
//!
//! This crate re-exports the core domain types and the location session, and
//! exposes the HTTP and file adapters behind the `http` feature.

#![forbid(unsafe_code)]

pub use uniroute_core::{
    Coordinate, CoordinateError, CurrentUser, DEFAULT_CITY_CENTER, DEFAULT_WALKING_SPEED_KMH,
    EARTH_RADIUS_KM, GeolocationError, GeolocationRequest, Geolocator, LocationSource,
    NearestStop, RouteSummary, RoutedPath, RoutingEngine, RoutingError, SavedAddress, SourceKind,
    Stop, StopId, StopSource, StopSourceError, StopTime, TargetSelection, UserLocation, Viewport,
    distance_km, find_closest, format_distance, format_walking_time, walking_time_minutes,
};

#[cfg(feature = "test-support")]
pub use uniroute_core::test_support;

pub use uniroute_session::{
    LocationSession, ReconcilerConfig, RouteReconciler, SessionConfig, SessionEvent,
    SessionSnapshot, StopListFailure,
};

#[cfg(feature = "http")]
pub use uniroute_data::{
    FileStopSource, FixedGeolocator, HttpRoutingEngine, HttpRoutingEngineConfig, HttpStopSource,
    HttpStopSourceConfig, ProviderBuildError,
};
