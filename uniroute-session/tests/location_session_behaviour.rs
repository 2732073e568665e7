//! Behavioural tests for the location session running on paused time.
#![expect(
    clippy::float_arithmetic,
    reason = "assertions compare distances with a tolerance"
)]

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use uniroute_core::test_support::{
    MemoryStopSource, StubGeolocator, StubRoute, StubRoutingEngine,
};
use uniroute_core::{
    Coordinate, CurrentUser, DEFAULT_CITY_CENTER, GeolocationError, LocationSource, RoutingError,
    SavedAddress, SourceKind, Stop, StopId, StopSourceError, TargetSelection, UserLocation,
};
use uniroute_session::{LocationSession, SessionConfig};

type Session = LocationSession<StubRoutingEngine>;

const PAULISTA: Coordinate = Coordinate {
    latitude: -23.560,
    longitude: -46.655,
};
const IBIRAPUERA: Coordinate = Coordinate {
    latitude: -23.600,
    longitude: -46.700,
};
const NEAR_PAULISTA: Coordinate = Coordinate {
    latitude: -23.561,
    longitude: -46.656,
};

/// Fields drop in order, so the session releases its tasks before the runtime.
struct SessionWorld {
    engine: RefCell<Option<StubRoutingEngine>>,
    engine_handle: RefCell<Option<Arc<StubRoutingEngine>>>,
    session: RefCell<Option<Session>>,
    geolocator: RefCell<Option<StubGeolocator>>,
    stop_source: RefCell<Option<MemoryStopSource>>,
    runtime: Runtime,
}

impl SessionWorld {
    fn build_session(&self) {
        if self.session.borrow().is_some() {
            return;
        }
        let stub = self
            .engine
            .borrow_mut()
            .take()
            .expect("a routing engine step must run first");
        let engine = Arc::new(stub);
        *self.engine_handle.borrow_mut() = Some(Arc::clone(&engine));
        *self.session.borrow_mut() = Some(LocationSession::new(engine, SessionConfig::default()));
    }

    /// Run a synchronous transition inside the runtime context.
    fn with_session<R>(&self, action: impl FnOnce(&mut Session) -> R) -> R {
        self.build_session();
        let _guard = self.runtime.enter();
        let mut slot = self.session.borrow_mut();
        action(slot.as_mut().expect("session built"))
    }

    fn calls(&self) -> usize {
        self.engine_handle
            .borrow()
            .as_ref()
            .expect("session built")
            .calls()
            .len()
    }
}

#[fixture]
fn world() -> SessionWorld {
    let runtime = Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime");
    SessionWorld {
        engine: RefCell::new(None),
        engine_handle: RefCell::new(None),
        session: RefCell::new(None),
        geolocator: RefCell::new(None),
        stop_source: RefCell::new(None),
        runtime,
    }
}

// --- Given steps ---

#[given("a routing engine answering {metres:f64} metres")]
fn engine_answering(#[from(world)] world: &SessionWorld, metres: f64) {
    *world.engine.borrow_mut() = Some(StubRoutingEngine::new(StubRoute::distance(metres)));
}

#[given("a routing engine answering slowly for stop 1")]
fn engine_slow_for_paulista(#[from(world)] world: &SessionWorld) {
    let engine = StubRoutingEngine::new(StubRoute::distance(900.0))
        .with_route_to(PAULISTA, StubRoute::distance(160.0).after(Duration::from_secs(5)));
    *world.engine.borrow_mut() = Some(engine);
}

#[given("a routing engine that never answers")]
fn engine_silent(#[from(world)] world: &SessionWorld) {
    *world.engine.borrow_mut() = Some(StubRoutingEngine::new(StubRoute::pending()));
}

#[given("a routing engine that fails")]
fn engine_failing(#[from(world)] world: &SessionWorld) {
    let error = RoutingError::NoRoute {
        message: "no walkable path".to_owned(),
    };
    *world.engine.borrow_mut() = Some(StubRoutingEngine::new(StubRoute::failure(error)));
}

#[given("stops at Paulista and Ibirapuera")]
fn city_stops(#[from(world)] world: &SessionWorld) {
    world.with_session(|session| {
        session.set_stops(vec![
            Stop::new(1_u64, PAULISTA).with_name("Paulista"),
            Stop::new(2_u64, IBIRAPUERA).with_name("Ibirapuera"),
        ]);
    });
}

#[given("the user stands near Paulista")]
fn near_paulista(#[from(world)] world: &SessionWorld) {
    world.with_session(|session| {
        session.set_location(UserLocation::new(
            NEAR_PAULISTA,
            LocationSource::DeviceGeolocation,
        ));
    });
}

#[given("a stop source failing with HTTP {status:u16}")]
fn failing_stop_source(#[from(world)] world: &SessionWorld, status: u16) {
    *world.stop_source.borrow_mut() = Some(MemoryStopSource::failing(StopSourceError::Server {
        url: "http://stops.test/api/bus-stops".to_owned(),
        status,
    }));
}

#[given("a device without location access")]
fn device_denied(#[from(world)] world: &SessionWorld) {
    *world.geolocator.borrow_mut() =
        Some(StubGeolocator::failing(GeolocationError::PermissionDenied));
}

#[given("a device reporting a position far away")]
fn device_far_away(#[from(world)] world: &SessionWorld) {
    *world.geolocator.borrow_mut() = Some(StubGeolocator::at(DEFAULT_CITY_CENTER.center));
}

// --- When steps ---

#[when("{millis:u64} milliseconds pass")]
fn time_passes(#[from(world)] world: &SessionWorld, millis: u64) {
    world
        .runtime
        .block_on(async { tokio::time::sleep(Duration::from_millis(millis)).await });
}

#[when("I select stop {id:u64}")]
fn select(#[from(world)] world: &SessionWorld, id: u64) {
    world.with_session(|session| session.select_stop(id));
}

#[when("the user moves south-west of the city")]
fn move_south_west(#[from(world)] world: &SessionWorld) {
    world.with_session(|session| {
        session.set_location(UserLocation::new(
            Coordinate {
                latitude: -23.700,
                longitude: -46.800,
            },
            LocationSource::DeviceGeolocation,
        ));
    });
}

#[when("the route settles")]
fn route_settles(#[from(world)] world: &SessionWorld) {
    world.build_session();
    let mut slot = world.session.borrow_mut();
    let session = slot.as_mut().expect("session built");
    assert!(world.runtime.block_on(session.settle()), "a route was pending");
}

#[when("I load the stops")]
fn load_stops(#[from(world)] world: &SessionWorld) {
    world.build_session();
    let configured = world.stop_source.borrow();
    let source = configured.as_ref().expect("stop source configured");
    let mut slot = world.session.borrow_mut();
    let session = slot.as_mut().expect("session built");
    world.runtime.block_on(session.load_stops(source));
}

fn start_session(world: &SessionWorld, user: &CurrentUser) {
    world.build_session();
    let configured = world.geolocator.borrow();
    let geolocator = configured.as_ref().expect("device configured");
    let mut slot = world.session.borrow_mut();
    let session = slot.as_mut().expect("session built");
    world.runtime.block_on(session.initialise(user, geolocator));
}

#[when("the session starts for a user without a saved address")]
fn start_without_address(#[from(world)] world: &SessionWorld) {
    start_session(world, &CurrentUser::default());
}

#[when("the session starts for a user with a saved address near Paulista")]
fn start_with_address(#[from(world)] world: &SessionWorld) {
    let user = CurrentUser {
        name: "Ana".to_owned(),
        address: Some(SavedAddress::at(NEAR_PAULISTA)),
    };
    start_session(world, &user);
}

// --- Then steps ---

#[then("the target is stop {id:u64}")]
fn target_is(#[from(world)] world: &SessionWorld, id: u64) {
    let snapshot = world.with_session(|session| session.snapshot());
    let target = snapshot.resolved_target.expect("a target stop");
    assert_eq!(target.id, StopId::from(id));
}

#[then("the selection is automatic")]
fn selection_auto(#[from(world)] world: &SessionWorld) {
    let selection = world.with_session(|session| session.selection().clone());
    assert_eq!(selection, TargetSelection::Auto);
}

#[then("the walking estimate is routed at {km:f64} km and {minutes:u32} minutes")]
fn routed_estimate(#[from(world)] world: &SessionWorld, km: f64, minutes: u32) {
    let snapshot = world.with_session(|session| session.snapshot());
    let summary = snapshot.route_summary.expect("a walking estimate");
    let target = snapshot.resolved_target.expect("a target stop");
    assert_eq!(summary.stop_id, target.id, "estimate must describe the target");
    assert_eq!(summary.source_kind, SourceKind::Routed);
    assert!(
        (summary.distance_km - km).abs() < 1e-9,
        "expected {km} km, got {}",
        summary.distance_km
    );
    assert_eq!(summary.walking_time_minutes, minutes);
}

#[then("the walking estimate is a straight line of about {km:f64} km")]
fn straight_line_estimate(#[from(world)] world: &SessionWorld, km: f64) {
    let summary = world
        .with_session(|session| session.snapshot().route_summary)
        .expect("a walking estimate");
    assert_eq!(summary.source_kind, SourceKind::StraightLine);
    assert!(
        (summary.distance_km - km).abs() < 0.01,
        "expected about {km} km, got {}",
        summary.distance_km
    );
}

#[then("no route is pending")]
fn nothing_pending(#[from(world)] world: &SessionWorld) {
    assert!(!world.with_session(|session| session.snapshot().is_routing));
}

#[then("the engine was asked for {count:usize} routes")]
fn engine_calls(#[from(world)] world: &SessionWorld, count: usize) {
    assert_eq!(world.calls(), count);
}

#[then("a retryable stop list error is shown")]
fn stop_list_error(#[from(world)] world: &SessionWorld) {
    let failure = world
        .with_session(|session| session.snapshot().stop_list_error)
        .expect("a stop list error");
    assert!(failure.retryable);
    assert!(failure.message.contains("503"), "got {}", failure.message);
}

#[then("the session has {count:usize} stops")]
fn stop_count(#[from(world)] world: &SessionWorld, count: usize) {
    assert_eq!(world.with_session(|session| session.stops().len()), count);
}

#[then("the location is unavailable")]
fn location_unavailable(#[from(world)] world: &SessionWorld) {
    let snapshot = world.with_session(|session| session.snapshot());
    assert!(snapshot.location_unavailable);
    assert_eq!(snapshot.location, None);
}

#[then("the map shows the default city centre")]
fn default_viewport(#[from(world)] world: &SessionWorld) {
    let viewport = world.with_session(|session| session.snapshot().viewport);
    assert_eq!(viewport, DEFAULT_CITY_CENTER);
}

#[then("the location comes from the saved address")]
fn saved_address_location(#[from(world)] world: &SessionWorld) {
    let location = world
        .with_session(|session| session.location().copied())
        .expect("a location");
    assert_eq!(location.source, LocationSource::SavedAddress);
    assert_eq!(location.coordinate, NEAR_PAULISTA);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $index:literal) => {
        #[scenario(path = "tests/features/location_session.feature", index = $index)]
        fn $fn_name(world: SessionWorld) {
            let _ = world;
        }
    };
}

register_scenario!(routed_estimate_replaces_straight_line, 0);
register_scenario!(selection_discards_pending_route, 1);
register_scenario!(moving_releases_manual_selection, 2);
register_scenario!(silent_engine_falls_back, 3);
register_scenario!(failing_engine_falls_back, 4);
register_scenario!(rapid_changes_reach_engine_once, 5);
register_scenario!(stop_list_failure_is_retryable, 6);
register_scenario!(missing_location_shows_city_centre, 7);
register_scenario!(saved_address_preferred, 8);
