//! Resolution of `HH:mm` schedule strings into absolute simulated timestamps.
//!
//! Schedules only carry a time of day. Each time is anchored to a base date and,
//! walking the schedule in order, any time that would precede the one before it
//! is taken to fall on the following day. A schedule may therefore cross midnight
//! at any leg boundary, as often as it needs to.

use crate::util::TimeWindow;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// An error in a schedule string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid time of day {0:?}, expected HH:mm")]
    InvalidTime(String),
}

/// Parses a 24-hour `HH:mm` time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(value.to_owned());
    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours = hours.parse::<u32>().map_err(|_| invalid())?;
    let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Anchors an ordered sequence of times of day to `base_date`,
/// moving each one forward a day at a time until it no longer precedes its predecessor.
pub fn resolve_sequence(
    times: impl IntoIterator<Item = NaiveTime>,
    base_date: NaiveDate,
) -> Vec<NaiveDateTime> {
    let mut resolved: Vec<NaiveDateTime> = vec![];
    for time in times {
        let mut time = base_date.and_time(time);
        if let Some(last) = resolved.last() {
            while time < *last {
                time += Duration::days(1);
            }
        }
        resolved.push(time);
    }
    resolved
}

/// Parses and resolves an ordered sequence of `HH:mm` strings.
/// The result has the same length as the input and is non-decreasing.
pub fn resolve_sequential_times<S: AsRef<str>>(
    times: &[S],
    base_date: NaiveDate,
) -> Result<Vec<NaiveDateTime>, ScheduleError> {
    let times = times
        .iter()
        .map(|t| parse_time_of_day(t.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resolve_sequence(times, base_date))
}

/// Resolves a departure/arrival pair. An arrival earlier than the departure
/// is taken to be on the following day.
pub fn resolve_window(
    departure: NaiveTime,
    arrival: NaiveTime,
    base_date: NaiveDate,
) -> TimeWindow {
    let start = base_date.and_time(departure);
    let mut end = base_date.and_time(arrival);
    if end < start {
        end += Duration::days(1);
    }
    TimeWindow::new(start, end)
}

/// The resolved schedule of a route: departure, then the arrival and departure
/// at each stop in order, then the final arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    anchors: Vec<NaiveDateTime>,
}

impl Timeline {
    /// Resolves a route's times of day, given in schedule order.
    ///
    /// # Parameters
    /// * `departure` - Departure from the origin.
    /// * `stops` - The `(arrival, departure)` pair of each intermediate stop.
    /// * `arrival` - Arrival at the destination.
    pub fn new(
        departure: NaiveTime,
        stops: &[(NaiveTime, NaiveTime)],
        arrival: NaiveTime,
        base_date: NaiveDate,
    ) -> Self {
        let anchors = if stops.is_empty() {
            let window = resolve_window(departure, arrival, base_date);
            vec![window.min, window.max]
        } else {
            let times = std::iter::once(departure)
                .chain(stops.iter().flat_map(|(arr, dep)| [*arr, *dep]))
                .chain(std::iter::once(arrival));
            resolve_sequence(times, base_date)
        };
        Self { anchors }
    }

    /// All the resolved times, in schedule order.
    pub fn anchors(&self) -> &[NaiveDateTime] {
        &self.anchors
    }

    /// The number of intermediate stops.
    pub fn num_stops(&self) -> usize {
        (self.anchors.len() - 2) / 2
    }

    /// The departure time from the origin.
    pub fn departure(&self) -> NaiveDateTime {
        self.anchors[0]
    }

    /// The arrival time at the destination.
    pub fn arrival(&self) -> NaiveDateTime {
        self.anchors[self.anchors.len() - 1]
    }

    /// The span from departure to final arrival.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.departure(), self.arrival())
    }

    /// The span the vehicle spends at stop `idx`.
    pub fn dwell(&self, idx: usize) -> TimeWindow {
        TimeWindow::new(self.anchors[2 * idx + 1], self.anchors[2 * idx + 2])
    }

    /// The span of travel leg `idx`, which ends at stop `idx`
    /// (or at the destination, for the last leg).
    pub fn leg(&self, idx: usize) -> TimeWindow {
        TimeWindow::new(self.anchors[2 * idx], self.anchors[2 * idx + 1])
    }

    /// The number of travel legs.
    pub fn num_legs(&self) -> usize {
        self.num_stops() + 1
    }
}
