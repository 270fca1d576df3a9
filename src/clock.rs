use crate::util::TimeWindow;
use chrono::NaiveDateTime;

/// The upper bound of simulation progress.
pub const PROGRESS_MAX: f64 = 100.0;

/// Maps simulation progress onto the span of simulated time covered by a set of routes.
///
/// Progress `0` is the earliest departure and `PROGRESS_MAX` the latest arrival.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationClock {
    window: Option<TimeWindow>,
}

impl SimulationClock {
    /// Creates a clock spanning all the given route windows.
    pub fn new(windows: impl IntoIterator<Item = TimeWindow>) -> Self {
        Self {
            window: windows.into_iter().reduce(|a, b| a.hull(&b)),
        }
    }

    /// The span of simulated time, or `None` if there are no routes.
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    /// The global simulated time at the given progress.
    pub fn time_at(&self, progress: f64) -> Option<NaiveDateTime> {
        let fraction = (progress / PROGRESS_MAX).clamp(0.0, 1.0);
        self.window.map(|w| w.time_at(fraction))
    }

    /// The progress at which the given simulated time is reached.
    pub fn progress_at(&self, time: NaiveDateTime) -> Option<f64> {
        self.window.map(|w| PROGRESS_MAX * w.fraction_at(time, 1))
    }

    /// A route's local clock: the global time held within the route's own window.
    pub fn local_time(global: NaiveDateTime, route: TimeWindow) -> NaiveDateTime {
        route.clamp(global)
    }
}
