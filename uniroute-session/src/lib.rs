//! Stateful reconciliation of location, stops and walking routes.
//!
//! [`LocationSession`] is the single owner of the user's location, the stop
//! list and the target selection. It resolves the target stop, shows an
//! immediate straight-line estimate and asks a [`RouteReconciler`] for a
//! routed one. The reconciler guarantees that results from superseded
//! requests never reach the session. The presentation layer reads
//! [`SessionSnapshot`] values and never mutates session state.

#![forbid(unsafe_code)]

pub mod reconciler;
mod session;
mod snapshot;

pub use reconciler::{
    DEFAULT_DEBOUNCE, DEFAULT_ROUTE_TIMEOUT, ReconcilerConfig, RouteKey, RouteOutcome,
    RouteReconciler, RouteTicket,
};
pub use session::{DEFAULT_LOCATION_EPSILON_KM, LocationSession, SessionConfig};
pub use snapshot::{SessionEvent, SessionSnapshot, StopListFailure};
