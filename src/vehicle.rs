use crate::math::LatLng;
use crate::path::RoutePath;
use crate::route::Route;
use crate::schedule::Timeline;
use crate::RouteId;
use chrono::NaiveDateTime;

/// Legs shorter than this are stretched to this length when computing fractions, in ms.
pub const MIN_LEG_MS: i64 = 1; // ms

/// What a vehicle is doing at a given moment of its schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Waiting at the origin.
    NotDeparted,
    /// Stopped at the intermediate stop with the given index.
    Dwelling { stop: usize },
    /// Travelling along the leg with the given index, which ends at stop `leg`
    /// (or at the destination, for the last leg).
    Travelling { leg: usize, fraction: f64 },
    /// Finished at the destination.
    Arrived,
}

impl Motion {
    /// Classifies a moment of a route's schedule.
    pub fn at(timeline: &Timeline, time: NaiveDateTime) -> Self {
        if timeline.window().duration_ms() == 0 || time >= timeline.arrival() {
            return Motion::Arrived;
        }
        if time <= timeline.departure() {
            return Motion::NotDeparted;
        }

        let dwelling = (0..timeline.num_stops()).find(|idx| {
            let dwell = timeline.dwell(*idx);
            time >= dwell.min && time < dwell.max
        });
        if let Some(stop) = dwelling {
            return Motion::Dwelling { stop };
        }

        (0..timeline.num_legs())
            .map(|idx| (idx, timeline.leg(idx)))
            .find(|(_, leg)| leg.contains(time))
            .map(|(leg, window)| Motion::Travelling {
                leg,
                fraction: window.fraction_at(time, MIN_LEG_MS),
            })
            .unwrap_or(Motion::Arrived)
    }
}

/// A snapshot of a route's vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vehicle {
    /// The ID of the route the vehicle runs.
    pub route: RouteId,
    /// The route's local clock time.
    pub time: NaiveDateTime,
    /// What the vehicle is doing.
    pub motion: Motion,
    /// Where the vehicle is.
    pub position: LatLng,
}

impl Vehicle {
    /// Locates a route's vehicle at the given local time.
    /// Returns `None` if the route's geometry has not been resolved.
    pub fn locate(route: &Route, time: NaiveDateTime) -> Option<Self> {
        let path = route.path()?;
        let motion = Motion::at(route.timeline(), time);
        Some(Self {
            route: route.id(),
            time,
            motion,
            position: position_for(route, path, motion),
        })
    }
}

/// Computes the position of a route's vehicle at the given local time.
/// Returns `None` if the route's geometry has not been resolved.
pub fn position_at(route: &Route, time: NaiveDateTime) -> Option<LatLng> {
    Vehicle::locate(route, time).map(|v| v.position)
}

fn position_for(route: &Route, path: &RoutePath, motion: Motion) -> LatLng {
    match motion {
        Motion::NotDeparted => route.origin(),
        Motion::Arrived => route.destination(),
        Motion::Dwelling { stop } => route.stops()[stop].location,
        Motion::Travelling { .. } if path.is_degenerate() => path.start(),
        Motion::Travelling { leg, fraction } => {
            path.sample_at_distance(path.leg(leg).lerp(fraction))
        }
    }
}
