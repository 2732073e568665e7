//! Pedestrian routing over HTTP.
//!
//! This module provides [`HttpRoutingEngine`], an implementation of
//! [`uniroute_core::RoutingEngine`] that asks an OSRM Route service for the
//! walking path between two coordinates.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use uniroute_data::routing::{HttpRoutingEngine, HttpRoutingEngineConfig};
//!
//! let config = HttpRoutingEngineConfig::new("http://localhost:5000")
//!     .with_profile("foot")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let engine = HttpRoutingEngine::with_config(config)?;
//! # Ok::<(), uniroute_data::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRoutingEngine, HttpRoutingEngineConfig};
