//! Deterministic collaborator doubles used by unit and behaviour tests.
//!
//! Delays use `tokio::time::sleep`, so tests running with paused time observe
//! them without waiting on the wall clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    Coordinate, GeolocationError, GeolocationRequest, Geolocator, RoutedPath, RoutingEngine,
    RoutingError, Stop, StopId, StopSource, StopSourceError, StopTime,
};

/// Scripted answer returned by [`StubRoutingEngine`].
#[derive(Debug, Clone)]
pub struct StubRoute {
    delay: Duration,
    outcome: Option<Result<RoutedPath, RoutingError>>,
}

impl StubRoute {
    /// Succeed with a straight two-point path of `distance_meters`.
    #[must_use]
    pub fn distance(distance_meters: f64) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Some(Ok(RoutedPath {
                distance_meters,
                path: Vec::new(),
            })),
        }
    }

    /// Fail with `error`.
    #[must_use]
    pub fn failure(error: RoutingError) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Some(Err(error)),
        }
    }

    /// Never answer.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: None,
        }
    }

    /// Answer only after `delay`.
    #[must_use]
    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request observed by [`StubRoutingEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteCall {
    /// Requested origin.
    pub origin: Coordinate,
    /// Requested destination.
    pub destination: Coordinate,
}

/// `RoutingEngine` that replays scripted answers keyed by destination.
///
/// Every call is recorded before the scripted delay starts, so tests can
/// assert how many requests actually reached the engine.
#[derive(Debug, Clone)]
pub struct StubRoutingEngine {
    fallback: StubRoute,
    scripts: Vec<(Coordinate, StubRoute)>,
    calls: Arc<Mutex<Vec<RouteCall>>>,
}

impl StubRoutingEngine {
    /// Engine answering every request with `fallback`.
    #[must_use]
    pub fn new(fallback: StubRoute) -> Self {
        Self {
            fallback,
            scripts: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer requests towards `destination` with `script`.
    #[must_use]
    pub fn with_route_to(mut self, destination: Coordinate, script: StubRoute) -> Self {
        self.scripts.push((destination, script));
        self
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RouteCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn script_for(&self, destination: Coordinate) -> &StubRoute {
        self.scripts
            .iter()
            .find(|(target, _)| *target == destination)
            .map_or(&self.fallback, |(_, script)| script)
    }
}

#[async_trait]
impl RoutingEngine for StubRoutingEngine {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RouteCall {
                origin,
                destination,
            });
        let script = self.script_for(destination).clone();
        tokio::time::sleep(script.delay).await;
        match script.outcome {
            Some(outcome) => outcome.map(|routed| RoutedPath {
                path: vec![origin, destination],
                ..routed
            }),
            None => std::future::pending().await,
        }
    }
}

/// `Geolocator` returning a fixed answer after an optional delay.
///
/// Every query is recorded, so tests can check the timeout and maximum age
/// the caller asked for.
#[derive(Debug, Clone)]
pub struct StubGeolocator {
    answer: Option<Result<Coordinate, GeolocationError>>,
    delay: Duration,
    requests: Arc<Mutex<Vec<GeolocationRequest>>>,
}

impl StubGeolocator {
    fn answering(answer: Option<Result<Coordinate, GeolocationError>>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report `coordinate`.
    #[must_use]
    pub fn at(coordinate: Coordinate) -> Self {
        Self::answering(Some(Ok(coordinate)))
    }

    /// Fail with `error`.
    #[must_use]
    pub fn failing(error: GeolocationError) -> Self {
        Self::answering(Some(Err(error)))
    }

    /// Never answer.
    #[must_use]
    pub fn silent() -> Self {
        Self::answering(None)
    }

    /// Answer only after `delay`.
    #[must_use]
    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queries received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GeolocationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Geolocator for StubGeolocator {
    async fn current_location(
        &self,
        request: GeolocationRequest,
    ) -> Result<Coordinate, GeolocationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        tokio::time::sleep(self.delay).await;
        match self.answer {
            Some(answer) => answer,
            None => std::future::pending().await,
        }
    }
}

/// In-memory `StopSource`.
#[derive(Debug, Clone)]
pub struct MemoryStopSource {
    stops: Result<Vec<Stop>, StopSourceError>,
    times: HashMap<StopId, Vec<StopTime>>,
}

impl MemoryStopSource {
    /// Source serving `stops`.
    #[must_use]
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        Self {
            stops: Ok(stops),
            times: HashMap::new(),
        }
    }

    /// Source failing every stop-list request with `error`.
    #[must_use]
    pub fn failing(error: StopSourceError) -> Self {
        Self {
            stops: Err(error),
            times: HashMap::new(),
        }
    }

    /// Serve `times` for `stop_id`.
    #[must_use]
    pub fn with_times(mut self, stop_id: StopId, times: Vec<StopTime>) -> Self {
        self.times.insert(stop_id, times);
        self
    }
}

#[async_trait]
impl StopSource for MemoryStopSource {
    async fn list_stops(&self) -> Result<Vec<Stop>, StopSourceError> {
        self.stops.clone()
    }

    async fn stop_times(&self, stop_id: &StopId) -> Result<Vec<StopTime>, StopSourceError> {
        self.times
            .get(stop_id)
            .cloned()
            .ok_or_else(|| StopSourceError::NotFound {
                what: format!("stop {stop_id}"),
            })
    }
}
