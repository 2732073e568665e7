//! Routing engine trait and the path it returns.

use async_trait::async_trait;

use crate::Coordinate;

use super::error::RoutingError;

/// A walking path between two coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutedPath {
    /// Total path length in metres.
    pub distance_meters: f64,
    /// Vertices of the path from origin to destination.
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: Vec<Coordinate>,
}

/// Compute pedestrian routes between two points.
///
/// Implementations must be `Send + Sync` so requests can run on spawned
/// tasks, and must report failures as [`RoutingError`] rather than panicking.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use uniroute_core::{Coordinate, RoutedPath, RoutingEngine, RoutingError, distance_km};
///
/// struct CrowFlies;
///
/// #[async_trait]
/// impl RoutingEngine for CrowFlies {
///     async fn route(
///         &self,
///         origin: Coordinate,
///         destination: Coordinate,
///     ) -> Result<RoutedPath, RoutingError> {
///         Ok(RoutedPath {
///             distance_meters: distance_km(origin, destination) * 1000.0,
///             path: vec![origin, destination],
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Return a walking path from `origin` to `destination`.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutedPath, RoutingError>;
}

#[async_trait]
impl<T> RoutingEngine for std::sync::Arc<T>
where
    T: RoutingEngine + ?Sized,
{
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        (**self).route(origin, destination).await
    }
}
