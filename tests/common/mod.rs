#![allow(dead_code)]

use route_sim::{LatLng, RouteDefinition, RouteId, Simulation, StopDefinition};

pub fn ll(lat: f64, lng: f64) -> LatLng {
    LatLng::new(lat, lng)
}

pub fn route(id: &str, departure: &str, arrival: &str, origin: LatLng, destination: LatLng) -> RouteDefinition {
    RouteDefinition {
        id: id.into(),
        origin,
        destination,
        stops: vec![],
        departure: departure.into(),
        arrival: arrival.into(),
        group: None,
    }
}

pub fn stop(id: &str, location: LatLng, arrival: &str, departure: &str) -> StopDefinition {
    StopDefinition {
        id: id.into(),
        location,
        arrival: arrival.into(),
        departure: departure.into(),
    }
}

/// Adds an active route with the given routed samples.
pub fn add_active(sim: &mut Simulation, def: &RouteDefinition, samples: &[LatLng]) -> RouteId {
    let id = sim.add_route(def).unwrap();
    sim.set_route_path(id, samples).unwrap();
    sim.set_route_active(id, true).unwrap();
    id
}

/// Progress values from 0 to 100 in steps of 0.1.
pub fn sweep() -> impl Iterator<Item = f64> {
    (0..=1000).map(|i| i as f64 / 10.0)
}
