//! Property-based tests for target resolution in the location session.
//!
//! # Invariants tested
//!
//! - **Auto follows nearest:** with automatic selection the resolved target is
//!   the stop chosen by `find_closest`, and the immediate estimate describes it.
//! - **Manual pins:** a listed manual stop is the target regardless of distance.
//! - **Movement releases:** moving beyond the jitter threshold always returns
//!   a manual selection to automatic.

use std::sync::Arc;

use proptest::prelude::*;
use tokio::runtime::{Builder, Runtime};
use uniroute_core::test_support::{StubRoute, StubRoutingEngine};
use uniroute_core::{
    Coordinate, LocationSource, Stop, StopId, TargetSelection, UserLocation, distance_km,
    find_closest,
};
use uniroute_session::{LocationSession, SessionConfig};

fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
    (-60.0_f64..=60.0, -180.0_f64..=180.0).prop_map(|(latitude, longitude)| Coordinate {
        latitude,
        longitude,
    })
}

fn stops_strategy() -> impl Strategy<Value = Vec<Stop>> {
    prop::collection::vec(coordinate_strategy(), 1..12).prop_map(|coordinates| {
        coordinates
            .into_iter()
            .zip(0_u64..)
            .map(|(coordinate, id)| Stop::new(id, coordinate))
            .collect()
    })
}

fn runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("test runtime")
}

fn session() -> LocationSession<StubRoutingEngine> {
    let engine = Arc::new(StubRoutingEngine::new(StubRoute::pending()));
    LocationSession::new(engine, SessionConfig::default())
}

fn device(coordinate: Coordinate) -> UserLocation {
    UserLocation::new(coordinate, LocationSource::DeviceGeolocation)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn auto_selection_follows_the_nearest_stop(
        stops in stops_strategy(),
        location in coordinate_strategy(),
    ) {
        let rt = runtime();
        let _guard = rt.enter();
        let mut session = session();
        let user = device(location);
        let expected = find_closest(Some(&user), &stops).map(|nearest| nearest.stop.id.clone());

        session.set_stops(stops);
        session.set_location(user);

        let target = session.resolved_target().map(|stop| stop.id.clone());
        prop_assert_eq!(&target, &expected);
        let summary_stop = session.route_summary().map(|summary| summary.stop_id.clone());
        prop_assert_eq!(summary_stop, expected);
    }

    #[test]
    fn manual_selection_pins_any_listed_stop(
        stops in stops_strategy(),
        location in coordinate_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let rt = runtime();
        let _guard = rt.enter();
        let mut session = session();
        let chosen: StopId = pick.get(&stops).id.clone();

        session.set_stops(stops);
        session.set_location(device(location));
        session.select_stop(chosen.clone());

        prop_assert_eq!(session.resolved_target().map(|stop| &stop.id), Some(&chosen));
        prop_assert_eq!(session.selection(), &TargetSelection::Manual(chosen));
    }

    #[test]
    fn moving_releases_a_manual_selection(
        stops in stops_strategy(),
        from in coordinate_strategy(),
        to in coordinate_strategy(),
    ) {
        prop_assume!(distance_km(from, to) > 0.01);
        let rt = runtime();
        let _guard = rt.enter();
        let mut session = session();
        let pinned = stops.last().map(|stop| stop.id.clone()).expect("non-empty stops");

        session.set_stops(stops);
        session.set_location(device(from));
        session.select_stop(pinned);
        session.set_location(device(to));

        prop_assert_eq!(session.selection(), &TargetSelection::Auto);
    }
}
