pub use chrono;
pub use clock::SimulationClock;
pub use event::{Event, EventKind, EventLog, EventTracker, RouteLog};
pub use math::LatLng;
pub use path::RoutePath;
pub use playback::Playback;
pub use route::{Route, RouteDefinition, RouteError, ScheduleField, Stop, StopDefinition};
pub use schedule::{ScheduleError, Timeline};
pub use simulation::{Frame, Simulation, SimulationAttributes};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::{Interval, TimeWindow};
pub use vehicle::{position_at, Motion, Vehicle};

mod clock;
mod event;
pub mod math;
pub mod path;
mod playback;
mod route;
pub mod schedule;
mod simulation;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Route].
    pub struct RouteId;
}

type RouteSet = SlotMap<RouteId, Route>;
