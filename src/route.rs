use crate::math::LatLng;
use crate::path::RoutePath;
use crate::schedule::{parse_time_of_day, ScheduleError, Timeline};
use crate::util::TimeWindow;
use crate::RouteId;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// A route as supplied by the route data: where it goes and when.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteDefinition {
    /// The route's identifier, which is also the name of its vehicle.
    pub id: String,
    /// Where the vehicle starts.
    pub origin: LatLng,
    /// Where the vehicle finishes.
    pub destination: LatLng,
    /// The intermediate stops, in the order they are visited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stops: Vec<StopDefinition>,
    /// Departure from the origin, `HH:mm`.
    pub departure: String,
    /// Arrival at the destination, `HH:mm`.
    pub arrival: String,
    /// An optional label used to select related routes together.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<String>,
}

/// An intermediate stop as supplied by the route data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopDefinition {
    pub id: String,
    pub location: LatLng,
    /// Arrival at the stop, `HH:mm`.
    pub arrival: String,
    /// Departure from the stop, `HH:mm`.
    pub departure: String,
}

/// A resolved intermediate stop.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub id: String,
    pub location: LatLng,
}

/// The schedule entry a [ScheduleError] was found in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleField {
    Departure,
    Arrival,
    StopArrival(String),
    StopDeparture(String),
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleField::Departure => write!(f, "departure"),
            ScheduleField::Arrival => write!(f, "arrival"),
            ScheduleField::StopArrival(stop) => write!(f, "stop {stop} arrival"),
            ScheduleField::StopDeparture(stop) => write!(f, "stop {stop} departure"),
        }
    }
}

/// An error in a route definition, or in a request about a route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("route {route}: {field}: {source}")]
    Schedule {
        route: String,
        field: ScheduleField,
        #[source]
        source: ScheduleError,
    },

    #[error("duplicate route id {0:?}")]
    DuplicateRoute(String),

    #[error("unknown route {0:?}")]
    UnknownRoute(RouteId),
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// A route with its schedule resolved to absolute times.
#[derive(Clone, Debug)]
pub struct Route {
    /// The route's ID.
    id: RouteId,
    /// The identifier the route was defined with.
    name: String,
    group: Option<String>,
    origin: LatLng,
    destination: LatLng,
    stops: Vec<Stop>,
    timeline: Timeline,
    /// The travel path, once its geometry has been resolved.
    path: Option<RoutePath>,
}

impl Route {
    /// Resolves a route definition against the given base date.
    pub(crate) fn new(id: RouteId, def: &RouteDefinition, base_date: NaiveDate) -> Result<Self> {
        let parse = |field: ScheduleField, value: &str| -> Result<NaiveTime> {
            parse_time_of_day(value).map_err(|source| RouteError::Schedule {
                route: def.id.clone(),
                field,
                source,
            })
        };

        let departure = parse(ScheduleField::Departure, &def.departure)?;
        let stop_times = def
            .stops
            .iter()
            .map(|stop| {
                let arr = parse(ScheduleField::StopArrival(stop.id.clone()), &stop.arrival)?;
                let dep = parse(ScheduleField::StopDeparture(stop.id.clone()), &stop.departure)?;
                Ok((arr, dep))
            })
            .collect::<Result<Vec<_>>>()?;
        let arrival = parse(ScheduleField::Arrival, &def.arrival)?;

        Ok(Self {
            id,
            name: def.id.clone(),
            group: def.group.clone(),
            origin: def.origin,
            destination: def.destination,
            stops: def
                .stops
                .iter()
                .map(|stop| Stop {
                    id: stop.id.clone(),
                    location: stop.location,
                })
                .collect(),
            timeline: Timeline::new(departure, &stop_times, arrival, base_date),
            path: None,
        })
    }

    /// Gets the route's ID.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The identifier the route was defined with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The route's group label, if it has one.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn origin(&self) -> LatLng {
        self.origin
    }

    pub fn destination(&self) -> LatLng {
        self.destination
    }

    /// The intermediate stops, in schedule order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The resolved schedule.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The span from departure to final arrival.
    pub fn window(&self) -> TimeWindow {
        self.timeline.window()
    }

    /// The travel path, if its geometry has been resolved.
    pub fn path(&self) -> Option<&RoutePath> {
        self.path.as_ref()
    }

    /// Sets the routed geometry between origin and destination.
    /// An empty sample list marks the geometry as unresolved.
    pub(crate) fn set_path(&mut self, samples: &[LatLng]) {
        self.path = if samples.is_empty() {
            None
        } else {
            let stops = self.stops.iter().map(|s| s.location).collect::<Vec<_>>();
            Some(RoutePath::new(self.origin, samples, self.destination, &stops))
        };
    }

    /// Whether the route's id or group contains `term`, ignoring case.
    pub(crate) fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self
                .group
                .as_ref()
                .map_or(false, |g| g.to_lowercase().contains(&term))
    }
}
