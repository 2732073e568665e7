//! Asynchronous walking routes that never leak stale results.
//!
//! [`RouteReconciler`] owns at most one authoritative request at a time. Each
//! request is identified by a [`RouteKey`] (origin plus target stop) and
//! stamped with a monotonically increasing [`RouteTicket`]:
//!
//! - a request for the key already in flight attaches to it instead of
//!   starting a duplicate;
//! - a request for a different key supersedes the current one, aborting its
//!   task while it is still debouncing or waiting on the engine;
//! - completions are matched against the current ticket when they are
//!   consumed, so an outcome that slips through after supersession is dropped.
//!
//! Engine failures and timeouts are not errors to the caller:
//! [`RouteReconciler::summarise`] turns them into a straight-line summary.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uniroute_core::{
    Coordinate, DEFAULT_WALKING_SPEED_KMH, RouteSummary, RoutedPath, RoutingEngine, RoutingError,
    Stop, StopId,
};

/// Delay before a request is sent, absorbing rapid target changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Time allowed for the engine to answer.
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for [`RouteReconciler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilerConfig {
    /// Delay before the engine is called; reset by every new key.
    pub debounce: Duration,
    /// Upper bound on a single engine call.
    pub timeout: Duration,
    /// Walking speed used to derive minutes from distance.
    pub walking_speed_kmh: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_ROUTE_TIMEOUT,
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }
}

impl ReconcilerConfig {
    /// Set the debounce delay.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the engine timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the walking speed.
    #[must_use]
    pub const fn with_walking_speed_kmh(mut self, walking_speed_kmh: f64) -> Self {
        self.walking_speed_kmh = walking_speed_kmh;
        self
    }
}

/// Identity of a routing request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteKey {
    /// Where the walk starts.
    pub origin: Coordinate,
    /// Stop the walk ends at.
    pub stop_id: StopId,
}

/// Stamp distinguishing successive requests; later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteTicket(u64);

impl fmt::Display for RouteTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A completed engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    /// Ticket of the request that produced the outcome.
    pub ticket: RouteTicket,
    /// Key of that request.
    pub key: RouteKey,
    /// Coordinate of the target stop.
    pub destination: Coordinate,
    /// Engine answer, with timeouts reported as [`RoutingError::Timeout`].
    pub result: Result<RoutedPath, RoutingError>,
}

#[derive(Debug)]
struct InFlight {
    ticket: RouteTicket,
    key: RouteKey,
    task: JoinHandle<()>,
}

/// Issues routing requests and filters their completions.
///
/// Requests run on spawned Tokio tasks, so [`RouteReconciler::request_route`]
/// must be called from within a Tokio runtime. Dropping the reconciler aborts
/// the pending request.
pub struct RouteReconciler<E: ?Sized> {
    engine: Arc<E>,
    config: ReconcilerConfig,
    last_ticket: u64,
    in_flight: Option<InFlight>,
    sender: mpsc::UnboundedSender<RouteOutcome>,
    receiver: mpsc::UnboundedReceiver<RouteOutcome>,
}

impl<E: ?Sized> fmt::Debug for RouteReconciler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteReconciler")
            .field("config", &self.config)
            .field("last_ticket", &self.last_ticket)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<E> RouteReconciler<E>
where
    E: RoutingEngine + ?Sized + 'static,
{
    /// Create a reconciler calling `engine`.
    #[must_use]
    pub fn new(engine: Arc<E>, config: ReconcilerConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            engine,
            config,
            last_ticket: 0,
            in_flight: None,
            sender,
            receiver,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Request a walking route from `origin` to `target`.
    ///
    /// Returns the ticket whose outcome will be delivered by
    /// [`RouteReconciler::next_outcome`]. Repeating the in-flight key returns
    /// the existing ticket without a new engine call.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn request_route(&mut self, origin: Coordinate, target: &Stop) -> RouteTicket {
        let key = RouteKey {
            origin,
            stop_id: target.id.clone(),
        };
        if let Some(in_flight) = self.in_flight.as_ref().filter(|pending| pending.key == key) {
            debug!(
                "route to stop {} already in flight as {}",
                key.stop_id, in_flight.ticket
            );
            return in_flight.ticket;
        }

        self.cancel();
        self.last_ticket = self.last_ticket.wrapping_add(1);
        let ticket = RouteTicket(self.last_ticket);
        let task = tokio::spawn(run_request(
            Arc::clone(&self.engine),
            self.config,
            ticket,
            key.clone(),
            target.coordinate,
            self.sender.clone(),
        ));
        self.in_flight = Some(InFlight { ticket, key, task });
        ticket
    }

    /// Abandon the pending request, if any.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(
                "superseding route {} to stop {}",
                in_flight.ticket, in_flight.key.stop_id
            );
            in_flight.task.abort();
        }
    }

    /// Whether a request is awaiting its outcome.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Key of the pending request.
    #[must_use]
    pub fn pending_key(&self) -> Option<&RouteKey> {
        self.in_flight.as_ref().map(|in_flight| &in_flight.key)
    }

    /// Ticket of the pending request.
    #[must_use]
    pub fn current_ticket(&self) -> Option<RouteTicket> {
        self.in_flight.as_ref().map(|in_flight| in_flight.ticket)
    }

    /// Wait for the outcome of the pending request.
    ///
    /// Stale outcomes are discarded while waiting. Returns `None` at once
    /// when nothing is pending. Cancel safe.
    pub async fn next_outcome(&mut self) -> Option<RouteOutcome> {
        while self.in_flight.is_some() {
            let outcome = self.receiver.recv().await?;
            if let Some(current) = self.accept(outcome) {
                return Some(current);
            }
        }
        self.discard_queued();
        None
    }

    /// Take the outcome of the pending request if it has already arrived.
    pub fn try_next_outcome(&mut self) -> Option<RouteOutcome> {
        while let Ok(outcome) = self.receiver.try_recv() {
            if let Some(current) = self.accept(outcome) {
                return Some(current);
            }
        }
        None
    }

    /// Normalise an outcome, falling back to the straight-line distance when
    /// the engine failed.
    #[must_use]
    pub fn summarise(&self, outcome: RouteOutcome) -> RouteSummary {
        let speed = self.config.walking_speed_kmh;
        let RouteOutcome {
            key,
            destination,
            result,
            ..
        } = outcome;
        match result {
            Ok(path) => RouteSummary::routed(key.stop_id, path.distance_meters, speed),
            Err(err) => {
                warn!(
                    "routing to stop {} failed, using straight-line distance: {err}",
                    key.stop_id
                );
                RouteSummary::straight_line(key.stop_id, key.origin, destination, speed)
            }
        }
    }

    fn accept(&mut self, outcome: RouteOutcome) -> Option<RouteOutcome> {
        if self.current_ticket() == Some(outcome.ticket) {
            self.in_flight = None;
            return Some(outcome);
        }
        debug!(
            "discarding stale route {} to stop {}",
            outcome.ticket, outcome.key.stop_id
        );
        None
    }

    fn discard_queued(&mut self) {
        while let Ok(outcome) = self.receiver.try_recv() {
            debug!(
                "discarding stale route {} to stop {}",
                outcome.ticket, outcome.key.stop_id
            );
        }
    }
}

impl<E: ?Sized> Drop for RouteReconciler<E> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}

async fn run_request<E>(
    engine: Arc<E>,
    config: ReconcilerConfig,
    ticket: RouteTicket,
    key: RouteKey,
    destination: Coordinate,
    sender: mpsc::UnboundedSender<RouteOutcome>,
) where
    E: RoutingEngine + ?Sized,
{
    tokio::time::sleep(config.debounce).await;
    debug!("requesting route {ticket} to stop {}", key.stop_id);
    let result = tokio::time::timeout(config.timeout, engine.route(key.origin, destination))
        .await
        .unwrap_or_else(|_| {
            Err(RoutingError::Timeout {
                target: format!("stop {}", key.stop_id),
                timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
            })
        });
    let outcome = RouteOutcome {
        ticket,
        key,
        destination,
        result,
    };
    if let Err(unsent) = sender.send(outcome) {
        debug!("reconciler dropped before route {ticket} completed: {unsent}");
    }
}
