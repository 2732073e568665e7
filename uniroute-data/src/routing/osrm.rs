//! OSRM API response types for the Route service.
//!
//! The Route service finds the fastest path between the supplied coordinates
//! for the profile in the request URL. Only the first (best) route is used.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM status code reported when no path joins the coordinates.
pub const NO_ROUTE: &str = "NoRoute";

/// OSRM Route API response.
///
/// The response carries either a list of routes on success or an error
/// message on failure. The `code` field indicates the response status.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route found between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// A single route in a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Length of the route in metres.
    pub distance: f64,
    /// Route geometry; present when `geometries=geojson` is requested.
    pub geometry: Option<LineString>,
}

/// GeoJSON `LineString` geometry with `[longitude, latitude]` positions.
#[derive(Debug, Deserialize)]
pub struct LineString {
    /// Vertices of the line.
    pub coordinates: Vec<[f64; 2]>,
}
