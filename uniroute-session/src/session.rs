//! The location session state machine.
//!
//! [`LocationSession`] owns the user's location, the stop list and the target
//! selection. Every transition recomputes the resolved target and, when both a
//! location and a target are known, shows a straight-line estimate at once
//! while a routed estimate is requested in the background. Routed outcomes are
//! applied by [`LocationSession::settle`] or [`LocationSession::poll_route`]
//! and only when they still describe the current origin and target.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, trace, warn};
use tokio::sync::{broadcast, watch};
use uniroute_core::{
    CurrentUser, DEFAULT_CITY_CENTER, DEFAULT_GEOLOCATION_MAX_AGE, DEFAULT_GEOLOCATION_TIMEOUT,
    GeolocationError, GeolocationRequest, Geolocator, LocationSource, RouteSummary, RoutingEngine,
    SavedAddress, Stop, StopId, StopSource, StopSourceError, TargetSelection, UserLocation,
    Viewport, distance_km, find_closest,
};

use crate::reconciler::{ReconcilerConfig, RouteKey, RouteOutcome, RouteReconciler};
use crate::snapshot::{SessionEvent, SessionSnapshot, StopListFailure};

/// Movements up to this distance are treated as jitter.
pub const DEFAULT_LOCATION_EPSILON_KM: f64 = 0.001;

const EVENT_CAPACITY: usize = 64;

/// Tuning for [`LocationSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Viewport shown while no location is known.
    pub default_viewport: Viewport,
    /// Time allowed for a device geolocation fix.
    pub geolocation_timeout: Duration,
    /// Oldest cached device fix that is acceptable.
    pub geolocation_max_age: Duration,
    /// Smallest movement that counts as a location change.
    pub location_epsilon_km: f64,
    /// Routing behaviour.
    pub routing: ReconcilerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_viewport: DEFAULT_CITY_CENTER,
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            geolocation_max_age: DEFAULT_GEOLOCATION_MAX_AGE,
            location_epsilon_km: DEFAULT_LOCATION_EPSILON_KM,
            routing: ReconcilerConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Set the viewport shown without a location.
    #[must_use]
    pub const fn with_default_viewport(mut self, viewport: Viewport) -> Self {
        self.default_viewport = viewport;
        self
    }

    /// Set the device geolocation timeout.
    #[must_use]
    pub const fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    /// Set the maximum age of a cached device fix.
    #[must_use]
    pub const fn with_geolocation_max_age(mut self, maximum_age: Duration) -> Self {
        self.geolocation_max_age = maximum_age;
        self
    }

    /// Set the jitter threshold in kilometres.
    #[must_use]
    pub const fn with_location_epsilon_km(mut self, epsilon_km: f64) -> Self {
        self.location_epsilon_km = epsilon_km;
        self
    }

    /// Set the routing behaviour.
    #[must_use]
    pub const fn with_routing(mut self, routing: ReconcilerConfig) -> Self {
        self.routing = routing;
        self
    }
}

/// Reconciles location, stops and selection into a target and a walking
/// estimate.
///
/// Methods that may start a route request spawn Tokio tasks and must run
/// inside a runtime.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use uniroute_core::test_support::{StubRoute, StubRoutingEngine};
/// use uniroute_core::{Coordinate, LocationSource, SourceKind, Stop, UserLocation};
/// use uniroute_session::{LocationSession, SessionConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let engine = Arc::new(StubRoutingEngine::new(StubRoute::distance(900.0)));
/// let mut session = LocationSession::new(engine, SessionConfig::default());
/// session.set_stops(vec![Stop::new(1_u64, Coordinate { latitude: -23.560, longitude: -46.655 })]);
/// session.set_location(UserLocation::new(
///     Coordinate { latitude: -23.561, longitude: -46.656 },
///     LocationSource::DeviceGeolocation,
/// ));
/// assert!(session.settle().await);
/// let summary = session.snapshot().route_summary.expect("summary");
/// assert_eq!(summary.source_kind, SourceKind::Routed);
/// assert_eq!(summary.walking_time_minutes, 12);
/// # }
/// ```
#[derive(Debug)]
pub struct LocationSession<E: ?Sized> {
    config: SessionConfig,
    routes: RouteReconciler<E>,
    location: Option<UserLocation>,
    stops: Vec<Stop>,
    selection: TargetSelection,
    target_id: Option<StopId>,
    route_summary: Option<RouteSummary>,
    summary_key: Option<RouteKey>,
    stop_list_error: Option<StopSourceError>,
    location_error: Option<GeolocationError>,
    events: broadcast::Sender<SessionEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl<E> LocationSession<E>
where
    E: RoutingEngine + ?Sized + 'static,
{
    /// Create an empty session: no location, no stops, automatic selection.
    #[must_use]
    pub fn new(engine: Arc<E>, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (snapshots, _) = watch::channel(SessionSnapshot {
            viewport: config.default_viewport,
            ..SessionSnapshot::default()
        });
        Self {
            routes: RouteReconciler::new(engine, config.routing),
            config,
            location: None,
            stops: Vec::new(),
            selection: TargetSelection::Auto,
            target_id: None,
            route_summary: None,
            summary_key: None,
            stop_list_error: None,
            location_error: None,
            events,
            snapshots,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    /// Current stop list.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Current selection mode.
    #[must_use]
    pub const fn selection(&self) -> &TargetSelection {
        &self.selection
    }

    /// Latest walking estimate for the resolved target.
    #[must_use]
    pub const fn route_summary(&self) -> Option<&RouteSummary> {
        self.route_summary.as_ref()
    }

    /// Whether a routed estimate is pending.
    #[must_use]
    pub const fn is_routing(&self) -> bool {
        self.routes.is_pending()
    }

    /// The stop currently treated as the destination.
    ///
    /// Automatic selection resolves to the nearest stop, which needs a
    /// location. A manual selection resolves to the pinned stop, or to `None`
    /// when that stop is not in the list.
    #[must_use]
    pub fn resolved_target(&self) -> Option<&Stop> {
        match &self.selection {
            TargetSelection::Auto => {
                find_closest(self.location.as_ref(), &self.stops).map(|nearest| nearest.stop)
            }
            TargetSelection::Manual(id) => self.stops.iter().find(|stop| &stop.id == id),
        }
    }

    /// Replace the stop list.
    ///
    /// A manual selection whose stop is missing from `stops` reverts to
    /// automatic selection.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as a route request may be
    /// spawned.
    pub fn set_stops(&mut self, stops: Vec<Stop>) {
        if let TargetSelection::Manual(id) = &self.selection
            && !stops.iter().any(|stop| &stop.id == id)
        {
            info!("selected stop {id} is no longer listed; following the nearest stop");
            self.selection = TargetSelection::Auto;
        }
        let count = stops.len();
        self.stops = stops;
        self.stop_list_error = None;
        self.emit(SessionEvent::StopsReplaced { count });
        self.refresh_route();
    }

    /// Replace the user's location.
    ///
    /// Movements within the configured epsilon keep the previous coordinate
    /// and selection; only the source is updated. A real movement, or the
    /// first location, clears a manual selection.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as a route request may be
    /// spawned.
    pub fn set_location(&mut self, location: UserLocation) {
        if let Some(previous) = self.location
            && distance_km(previous.coordinate, location.coordinate)
                <= self.config.location_epsilon_km
        {
            if previous.source != location.source {
                let updated = UserLocation::new(previous.coordinate, location.source);
                self.location = Some(updated);
                self.emit(SessionEvent::LocationChanged(Some(updated)));
                self.publish();
            }
            return;
        }

        self.location = Some(location);
        self.location_error = None;
        self.release_manual_selection("location changed");
        self.emit(SessionEvent::LocationChanged(Some(location)));
        self.refresh_route();
    }

    /// Forget the user's location.
    pub fn clear_location(&mut self) {
        if self.location.take().is_none() {
            return;
        }
        self.release_manual_selection("location cleared");
        self.emit(SessionEvent::LocationChanged(None));
        self.refresh_route();
    }

    /// Pin the target to `stop_id`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as a route request may be
    /// spawned.
    pub fn select_stop(&mut self, stop_id: impl Into<StopId>) {
        self.selection = TargetSelection::Manual(stop_id.into());
        self.refresh_route();
    }

    /// Return to following the nearest stop.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as a route request may be
    /// spawned.
    pub fn clear_selection(&mut self) {
        self.selection = TargetSelection::Auto;
        self.refresh_route();
    }

    /// Load the stop list from `source`.
    ///
    /// A failure keeps the current list and is reported through the snapshot
    /// and a [`SessionEvent::StopListLoadFailed`] event.
    pub async fn load_stops<S>(&mut self, source: &S)
    where
        S: StopSource + ?Sized,
    {
        match source.list_stops().await {
            Ok(stops) => self.set_stops(stops),
            Err(err) => {
                warn!("failed to load stops: {err}");
                self.stop_list_error = Some(err.clone());
                self.emit(SessionEvent::StopListLoadFailed(err));
                self.publish();
            }
        }
    }

    /// Obtain the initial location for `user`.
    ///
    /// The saved address wins; without one the device is queried.
    pub async fn initialise<G>(&mut self, user: &CurrentUser, geolocator: &G)
    where
        G: Geolocator + ?Sized,
    {
        match user.saved_coordinate() {
            Some(coordinate) => {
                self.set_location(UserLocation::new(coordinate, LocationSource::SavedAddress));
            }
            None => self.refresh_location(geolocator).await,
        }
    }

    /// Query the device for a fresh location.
    ///
    /// Failures, including a device that never answers within the configured
    /// timeout, keep the current location and are logged.
    pub async fn refresh_location<G>(&mut self, geolocator: &G)
    where
        G: Geolocator + ?Sized,
    {
        let request = GeolocationRequest {
            timeout: self.config.geolocation_timeout,
            maximum_age: self.config.geolocation_max_age,
        };
        let fix = tokio::time::timeout(request.timeout, geolocator.current_location(request))
            .await
            .unwrap_or(Err(GeolocationError::Timeout));
        match fix {
            Ok(coordinate) => {
                self.set_location(UserLocation::new(
                    coordinate,
                    LocationSource::DeviceGeolocation,
                ));
            }
            Err(err) => {
                warn!("device location unavailable: {err}");
                self.location_error = Some(err);
                self.publish();
            }
        }
    }

    /// Apply an externally edited saved address.
    ///
    /// An address without a coordinate clears a location that came from the
    /// saved address and leaves a device location alone.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, as a route request may be
    /// spawned.
    pub fn apply_saved_address(&mut self, address: Option<&SavedAddress>) {
        match address.and_then(|saved| saved.coordinate) {
            Some(coordinate) => {
                self.set_location(UserLocation::new(coordinate, LocationSource::SavedAddress));
            }
            None => {
                if self
                    .location
                    .is_some_and(|current| current.source == LocationSource::SavedAddress)
                {
                    self.clear_location();
                }
            }
        }
    }

    /// Wait for the pending route and apply it.
    ///
    /// Returns `false` at once when no route is pending.
    pub async fn settle(&mut self) -> bool {
        match self.routes.next_outcome().await {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Apply the pending route if it has already completed.
    pub fn poll_route(&mut self) -> bool {
        match self.routes.try_next_outcome() {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            location: self.location,
            stops: self.stops.clone(),
            selection: self.selection.clone(),
            resolved_target: self.resolved_target().cloned(),
            route_summary: self.route_summary.clone(),
            is_routing: self.routes.is_pending(),
            viewport: Viewport::for_location(self.location.as_ref(), self.config.default_viewport),
            stop_list_error: self.stop_list_error.as_ref().map(StopListFailure::from),
            location_unavailable: self.location.is_none() && self.location_error.is_some(),
        }
    }

    /// Receiver always holding the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Receiver for change notifications.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Release the pending route request.
    pub fn shutdown(&mut self) {
        self.routes.cancel();
        self.publish();
    }

    fn release_manual_selection(&mut self, reason: &str) {
        if let TargetSelection::Manual(id) = &self.selection {
            info!("{reason}; releasing selected stop {id}");
            self.selection = TargetSelection::Auto;
        }
    }

    fn refresh_route(&mut self) {
        let target = self.resolved_target().cloned();
        let target_id = target.as_ref().map(|stop| stop.id.clone());
        if target_id != self.target_id {
            match &target_id {
                Some(id) => info!("target stop is now {id}"),
                None => info!("no target stop"),
            }
            self.target_id.clone_from(&target_id);
            self.emit(SessionEvent::TargetChanged(target_id));
        }

        match (self.location, target) {
            (Some(location), Some(stop)) => self.route_to(location, &stop),
            _ => {
                self.routes.cancel();
                self.set_summary(None, None);
            }
        }
        self.publish();
    }

    fn route_to(&mut self, location: UserLocation, stop: &Stop) {
        let key = RouteKey {
            origin: location.coordinate,
            stop_id: stop.id.clone(),
        };
        if self.routes.pending_key() == Some(&key) || self.summary_key.as_ref() == Some(&key) {
            return;
        }
        let estimate = RouteSummary::straight_line(
            stop.id.clone(),
            location.coordinate,
            stop.coordinate,
            self.config.routing.walking_speed_kmh,
        );
        self.set_summary(Some(estimate), Some(key));
        self.routes.request_route(location.coordinate, stop);
    }

    fn apply_outcome(&mut self, outcome: RouteOutcome) {
        let origin = self.location.map(|location| location.coordinate);
        if origin != Some(outcome.key.origin) || self.target_id.as_ref() != Some(&outcome.key.stop_id)
        {
            debug!(
                "discarding route {} to stop {}: no longer the current target",
                outcome.ticket, outcome.key.stop_id
            );
            return;
        }
        let key = outcome.key.clone();
        let summary = self.routes.summarise(outcome);
        self.set_summary(Some(summary), Some(key));
        self.publish();
    }

    fn set_summary(&mut self, summary: Option<RouteSummary>, key: Option<RouteKey>) {
        self.summary_key = key;
        if self.route_summary != summary {
            self.route_summary.clone_from(&summary);
            self.emit(SessionEvent::RouteUpdated(summary));
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(unsent) = self.events.send(event) {
            trace!("no event subscribers for {:?}", unsent.0);
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.snapshots.send_modify(|current| *current = snapshot);
    }
}
