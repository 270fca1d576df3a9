use crate::clock::{SimulationClock, PROGRESS_MAX};
use crate::event::{Event, EventLog, EventTracker};
use crate::math::LatLng;
use crate::route::{Result, Route, RouteDefinition, RouteError};
use crate::vehicle::Vehicle;
use crate::{RouteId, RouteSet};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};

/// The attributes of a simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulationAttributes {
    /// The calendar date that schedule times of day are anchored to.
    /// Defaults to 1970-01-01.
    pub base_date: NaiveDate,
}

/// The result of one simulation update.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// The progress the frame was computed for.
    pub progress: f64,
    /// The global simulated time, or `None` if no routes are active.
    pub time: Option<NaiveDateTime>,
    /// The vehicles of the active routes whose geometry is resolved.
    pub vehicles: Vec<Vehicle>,
    /// The events detected during this update.
    pub events: Vec<Event>,
}

/// A schedule simulation of many routes.
#[derive(Default)]
pub struct Simulation {
    attributes: SimulationAttributes,
    /// The routes, active or not.
    routes: RouteSet,
    /// Route IDs by defined identifier.
    names: HashMap<String, RouteId>,
    /// The routes currently being simulated.
    active: HashSet<RouteId>,
    /// The record of fired events.
    tracker: EventTracker,
    /// The formatted messages of all events fired so far.
    log: EventLog,
    /// The progress of the previous update.
    last_progress: Option<f64>,
    /// The global simulated time of the previous update.
    time: Option<NaiveDateTime>,
    /// The number of updates performed.
    frame: usize,
}

impl Simulation {
    /// Creates a new simulation.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new simulation with the given attributes.
    pub fn with_attributes(attributes: SimulationAttributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Creates a new simulation which records fired events in the given tracker.
    pub fn with_tracker(attributes: SimulationAttributes, tracker: EventTracker) -> Self {
        Self {
            attributes,
            tracker,
            ..Default::default()
        }
    }

    /// Adds a route to the simulation. The route starts inactive,
    /// with its geometry unresolved.
    pub fn add_route(&mut self, def: &RouteDefinition) -> Result<RouteId> {
        if self.names.contains_key(&def.id) {
            return Err(RouteError::DuplicateRoute(def.id.clone()));
        }
        let base_date = self.attributes.base_date;
        let id = self
            .routes
            .try_insert_with_key(|id| Route::new(id, def, base_date))?;
        self.names.insert(def.id.clone(), id);
        debug!("added route {} ({:?})", def.id, id);
        Ok(id)
    }

    /// Removes a route from the simulation.
    pub fn remove_route(&mut self, id: RouteId) {
        if let Some(route) = self.routes.remove(id) {
            self.names.remove(route.name());
        }
        self.active.remove(&id);
        self.tracker.forget(id);
    }

    /// Looks up a route by the identifier it was defined with.
    pub fn route_id(&self, name: &str) -> Option<RouteId> {
        self.names.get(name).copied()
    }

    /// Gets a reference to the route with the given ID.
    pub fn get_route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Returns an iterator over all the routes in the simulation.
    pub fn iter_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Sets the externally routed geometry of a route.
    /// An empty sample list marks the geometry as unresolved.
    pub fn set_route_path(&mut self, id: RouteId, samples: &[LatLng]) -> Result<()> {
        let route = self
            .routes
            .get_mut(id)
            .ok_or(RouteError::UnknownRoute(id))?;
        route.set_path(samples);
        Ok(())
    }

    /// Sets whether a route is simulated.
    pub fn set_route_active(&mut self, id: RouteId, active: bool) -> Result<()> {
        if self.get_route(id).is_none() {
            return Err(RouteError::UnknownRoute(id));
        }
        if active {
            self.active.insert(id);
        } else {
            self.active.remove(&id);
        }
        Ok(())
    }

    /// Replaces the set of simulated routes.
    pub fn set_active_routes(&mut self, ids: impl IntoIterator<Item = RouteId>) {
        self.active = ids
            .into_iter()
            .filter(|id| self.get_route(*id).is_some())
            .collect();
    }

    /// Whether a route is simulated.
    pub fn is_route_active(&self, id: RouteId) -> bool {
        self.active.contains(&id)
    }

    /// Activates every route in the given group.
    pub fn activate_group(&mut self, group: &str) {
        let ids = self
            .iter_routes()
            .filter(|route| route.group() == Some(group))
            .map(|route| route.id())
            .collect::<Vec<_>>();
        self.active.extend(ids);
    }

    /// Finds the routes whose identifier or group contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<RouteId> {
        self.iter_routes()
            .filter(|route| route.matches(term))
            .map(|route| route.id())
            .collect()
    }

    /// The clock spanning the schedules of the active routes.
    pub fn clock(&self) -> SimulationClock {
        SimulationClock::new(self.active_routes().map(|route| route.window()))
    }

    /// Updates the simulation to the given progress in `[0, 100]`,
    /// computing vehicle positions and detecting events.
    ///
    /// A progress lower than that of the previous update is a rewind:
    /// all event history is forgotten, so events fire again as they are reached.
    pub fn update(&mut self, progress: f64) -> Frame {
        if progress.is_nan() {
            warn!("ignoring NaN simulation progress");
            return Frame::default();
        }
        if !(0.0..=PROGRESS_MAX).contains(&progress) {
            warn!("simulation progress {} out of range", progress);
        }
        let progress = progress.clamp(0.0, PROGRESS_MAX);

        if self.last_progress.map_or(false, |last| progress < last) {
            debug!("rewind to {}, resetting event history", progress);
            self.tracker.reset();
        }
        self.last_progress = Some(progress);
        self.frame += 1;

        let clock = self.clock();
        self.time = clock.time_at(progress);
        let Some(now) = self.time else {
            return Frame {
                progress,
                ..Default::default()
            };
        };
        trace!("frame {}: progress {} -> {}", self.frame, progress, now);

        let mut vehicles = vec![];
        let mut events = vec![];
        for route in self.routes.values() {
            if !self.active.contains(&route.id()) {
                continue;
            }
            let time = SimulationClock::local_time(now, route.window());
            let Some(vehicle) = Vehicle::locate(route, time) else {
                debug!("route {} has no path, skipping", route.name());
                continue;
            };
            vehicles.push(vehicle);

            for event in self.tracker.detect(route, now) {
                debug!("{}", event);
                self.log.push(now, &event);
                events.push(event);
            }
        }

        Frame {
            progress,
            time: Some(now),
            vehicles,
            events,
        }
    }

    /// Forgets all event history and the previous progress.
    /// The message log is kept.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.last_progress = None;
    }

    /// The formatted messages of all events fired so far.
    pub fn messages(&self) -> &EventLog {
        &self.log
    }

    /// The record of fired events.
    pub fn tracker(&self) -> &EventTracker {
        &self.tracker
    }

    /// The global simulated time of the previous update, formatted `HH:mm`.
    pub fn clock_label(&self) -> String {
        self.time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "00:00".to_owned())
    }

    /// Gets the number of updates performed.
    pub fn frame(&self) -> usize {
        self.frame
    }

    fn active_routes(&self) -> impl Iterator<Item = &Route> {
        self.iter_routes()
            .filter(|route| self.active.contains(&route.id()))
    }
}
