//! Adapters connecting the UniRoute core to the outside world.
//!
//! Responsibilities:
//! - Implement the collaborator traits of `uniroute-core` over HTTP and files.
//! - Translate wire formats and transport failures into core types.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `uniroute-core` and
//!   `uniroute-session`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Every failure is reported as the core error type of its trait.
//! - No global mutable state.

mod client;
pub mod geolocation;
pub mod routing;
pub mod stops;

pub use client::ProviderBuildError;
pub use geolocation::FixedGeolocator;
pub use routing::{HttpRoutingEngine, HttpRoutingEngineConfig};
pub use stops::{FileStopSource, HttpStopSource, HttpStopSourceConfig};
