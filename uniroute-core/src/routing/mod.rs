//! Obtain walking routes from an external routing engine.
//!
//! The [`RoutingEngine`] trait abstracts a pedestrian routing service that
//! returns a path and its length for an origin/destination pair. Engines are
//! asynchronous because every real implementation waits on the network.
//!
//! Failures are reported as [`RoutingError`] values; callers recover by
//! falling back to the straight-line distance.

mod engine;
mod error;

pub use engine::{RoutedPath, RoutingEngine};
pub use error::RoutingError;
