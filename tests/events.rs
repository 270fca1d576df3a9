//! Tests of event detection across sweeps, pauses and rewinds.

mod common;

use common::*;
use route_sim::{EventKind, Frame, RouteId, Simulation};
use std::collections::HashMap;

fn simulation() -> (Simulation, RouteId, RouteId) {
    let mut sim = Simulation::new();
    let mut a = route("A", "08:00", "10:00", ll(0.0, 0.0), ll(0.0, 2.0));
    a.stops.push(stop("S1", ll(0.0, 1.0), "09:00", "09:15"));
    let a = add_active(&mut sim, &a, &[ll(0.0, 1.0)]);
    let b = add_active(
        &mut sim,
        &route("B", "09:30", "12:00", ll(1.0, 0.0), ll(1.0, 2.0)),
        &[ll(1.0, 1.0)],
    );
    (sim, a, b)
}

fn count(frames: &[Frame]) -> HashMap<(RouteId, EventKind), usize> {
    let mut counts = HashMap::new();
    for event in frames.iter().flat_map(|f| &f.events) {
        *counts.entry((event.route, event.kind.clone())).or_default() += 1;
    }
    counts
}

fn expected(a: RouteId, b: RouteId) -> Vec<(RouteId, EventKind)> {
    vec![
        (a, EventKind::DepartedOrigin),
        (a, EventKind::ArrivedStop("S1".into())),
        (a, EventKind::DepartedStop("S1".into())),
        (a, EventKind::ArrivedDestination),
        (b, EventKind::DepartedOrigin),
        (b, EventKind::ArrivedDestination),
    ]
}

/// Test that a forward sweep fires each event exactly once.
#[test]
fn sweep_fires_each_event_once() {
    let (mut sim, a, b) = simulation();
    let frames = sweep().map(|p| sim.update(p)).collect::<Vec<_>>();
    let counts = count(&frames);

    assert_eq!(counts.len(), 6);
    for key in expected(a, b) {
        assert_eq!(counts.get(&key), Some(&1), "{key:?}");
    }
    assert_eq!(sim.messages().len(), 6);
}

/// Test that events of one route are reported in schedule order.
#[test]
fn events_are_in_schedule_order() {
    let (mut sim, a, _) = simulation();
    sim.update(0.0);
    let frame = sim.update(100.0);
    let kinds = frame
        .events
        .iter()
        .filter(|e| e.route == a)
        .map(|e| e.kind.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            EventKind::ArrivedStop("S1".into()),
            EventKind::DepartedStop("S1".into()),
            EventKind::ArrivedDestination,
        ]
    );
}

/// Test that holding progress constant fires nothing further.
#[test]
fn constant_progress_fires_nothing() {
    let (mut sim, _, _) = simulation();
    let first = sim.update(50.0);
    assert!(!first.events.is_empty());
    for _ in 0..10 {
        assert!(sim.update(50.0).events.is_empty());
    }
}

/// Test that rewinding to the start lets every event fire once more.
#[test]
fn rewind_refires_every_event() {
    let (mut sim, a, b) = simulation();
    for progress in sweep() {
        sim.update(progress);
    }
    assert!(sim.update(100.0).events.is_empty());

    let frames = sweep().map(|p| sim.update(p)).collect::<Vec<_>>();
    let counts = count(&frames);
    for key in expected(a, b) {
        assert_eq!(counts.get(&key), Some(&1), "{key:?}");
    }
    assert_eq!(sim.messages().len(), 12);
}

/// Test that scrubbing backwards part way re-fires only what is reached again.
#[test]
fn partial_rewind_starts_clean() {
    let (mut sim, a, _) = simulation();
    sim.update(0.0);
    sim.update(40.0);
    let frame = sim.update(31.25);
    // 31.25% is 09:15: A has departed, arrived at and left S1.
    let kinds = frame
        .events
        .iter()
        .filter(|e| e.route == a)
        .map(|e| e.kind.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            EventKind::DepartedOrigin,
            EventKind::ArrivedStop("S1".into()),
            EventKind::DepartedStop("S1".into()),
        ]
    );
}

/// Test that toggling a route's activity does not corrupt its event history.
#[test]
fn deactivated_route_keeps_its_history() {
    let (mut sim, a, b) = simulation();
    let mut frames = vec![];
    frames.push(sim.update(0.0));
    frames.push(sim.update(50.0));
    sim.set_route_active(b, false).unwrap();
    frames.push(sim.update(50.0));
    sim.set_route_active(b, true).unwrap();
    frames.push(sim.update(50.0));
    frames.push(sim.update(100.0));

    let counts = count(&frames);
    for key in expected(a, b) {
        assert_eq!(counts.get(&key), Some(&1), "{key:?}");
    }
}

/// Test the formatting of the message log.
#[test]
fn messages_are_stamped_with_the_global_clock() {
    let (mut sim, _, _) = simulation();
    sim.update(0.0);
    sim.update(25.0);
    assert_eq!(
        sim.messages().lines(),
        &[
            "[08:00] Vehicle A departed origin",
            "[09:00] Vehicle A arrived at S1",
        ]
    );
}

/// Test that a simulation can continue from another's event history.
#[test]
fn injected_tracker_carries_history() {
    let (mut sim, a, _) = simulation();
    sim.update(0.0);
    sim.update(50.0);
    let tracker = sim.tracker().clone();
    assert!(tracker.log(a).unwrap().arrived_destination);

    let mut resumed = Simulation::with_tracker(Default::default(), tracker);
    let mut def = route("A", "08:00", "10:00", ll(0.0, 0.0), ll(0.0, 2.0));
    def.stops.push(stop("S1", ll(0.0, 1.0), "09:00", "09:15"));
    assert_eq!(add_active(&mut resumed, &def, &[ll(0.0, 1.0)]), a);

    assert!(resumed.update(100.0).events.is_empty());
}
