//! Exactly-once detection of schedule events.
//!
//! An event fires on the first update at which simulated time reaches its
//! threshold, i.e. when `last < threshold <= now` for the previously observed
//! time `last`. The first update of a route has no previous time, so every
//! threshold already reached fires then. Each event fires at most once until
//! the tracker is reset.

use crate::route::Route;
use crate::RouteId;
use chrono::NaiveDateTime;
use slotmap::SecondaryMap;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

/// The kind of a schedule event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The vehicle left its origin.
    DepartedOrigin,
    /// The vehicle reached the stop with the given id.
    ArrivedStop(String),
    /// The vehicle left the stop with the given id.
    DepartedStop(String),
    /// The vehicle reached its destination.
    ArrivedDestination,
}

/// A schedule event of one route's vehicle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// The ID of the route.
    pub route: RouteId,
    /// The route's defined identifier.
    pub vehicle: String,
    /// The simulated time at which the event was detected.
    pub time: NaiveDateTime,
    pub kind: EventKind,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vehicle = &self.vehicle;
        match &self.kind {
            EventKind::DepartedOrigin => write!(f, "Vehicle {vehicle} departed origin"),
            EventKind::ArrivedStop(stop) => write!(f, "Vehicle {vehicle} arrived at {stop}"),
            EventKind::DepartedStop(stop) => write!(f, "Vehicle {vehicle} departed {stop}"),
            EventKind::ArrivedDestination => write!(f, "Vehicle {vehicle} arrived at destination"),
        }
    }
}

/// The events already fired for one route.
#[derive(Clone, Debug, Default)]
pub struct RouteLog {
    /// The simulated time of the route's previous update.
    pub last_time: Option<NaiveDateTime>,
    pub departed_origin: bool,
    /// Indices of the stops arrived at.
    pub arrived_stops: HashSet<usize>,
    /// Indices of the stops departed from.
    pub departed_stops: HashSet<usize>,
    pub arrived_destination: bool,
}

impl RouteLog {
    /// Whether the given threshold has been reached since the previous update.
    fn crossed(&self, threshold: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self.last_time {
            None => now >= threshold,
            Some(last) => last < threshold && threshold <= now,
        }
    }
}

/// Tracks which events have fired for each route.
#[derive(Clone, Debug, Default)]
pub struct EventTracker {
    logs: SecondaryMap<RouteId, RouteLog>,
}

impl EventTracker {
    /// Creates a tracker with no history.
    pub fn new() -> Self {
        Default::default()
    }

    /// Forgets all history, so every event may fire again.
    pub fn reset(&mut self) {
        self.logs.clear();
    }

    /// Forgets the history of one route.
    pub fn forget(&mut self, route: RouteId) {
        self.logs.remove(route);
    }

    /// Gets the history of a route, if it has been updated since the last reset.
    pub fn log(&self, route: RouteId) -> Option<&RouteLog> {
        self.logs.get(route)
    }

    /// Detects the events of a route that are due at simulated time `now`,
    /// in schedule order, and records them as fired.
    pub fn detect(&mut self, route: &Route, now: NaiveDateTime) -> SmallVec<[Event; 4]> {
        let mut events = SmallVec::new();
        let Some(entry) = self.logs.entry(route.id()) else {
            return events;
        };
        let log = entry.or_default();
        let timeline = route.timeline();
        let mut fire = |kind| {
            events.push(Event {
                route: route.id(),
                vehicle: route.name().to_owned(),
                time: now,
                kind,
            })
        };

        if !log.departed_origin && log.crossed(timeline.departure(), now) {
            log.departed_origin = true;
            fire(EventKind::DepartedOrigin);
        }
        for (idx, stop) in route.stops().iter().enumerate() {
            let dwell = timeline.dwell(idx);
            if log.crossed(dwell.min, now) && log.arrived_stops.insert(idx) {
                fire(EventKind::ArrivedStop(stop.id.clone()));
            }
            if log.crossed(dwell.max, now) && log.departed_stops.insert(idx) {
                fire(EventKind::DepartedStop(stop.id.clone()));
            }
        }
        if !log.arrived_destination && log.crossed(timeline.arrival(), now) {
            log.arrived_destination = true;
            fire(EventKind::ArrivedDestination);
        }

        log.last_time = Some(now);
        events
    }
}

/// An append-only log of formatted event messages.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    /// Appends an event as `[HH:mm] <text>`, stamped with the given clock time.
    pub fn push(&mut self, time: NaiveDateTime, event: &Event) {
        self.lines.push(format!("[{}] {}", time.format("%H:%M"), event));
    }

    /// The messages, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
