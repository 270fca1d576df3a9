//! Miscellaneous utility structs and functions.

use chrono::{Duration, NaiveDateTime};
use std::fmt::Debug;

/// A closed interval on an ordered line, such as a span of distance or of time.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

/// A span of simulated clock time.
pub type TimeWindow = Interval<NaiveDateTime>;

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// Restricts a value to lie within the interval.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// The smallest interval containing both this interval and the other.
    pub fn hull(&self, other: &Self) -> Self {
        Self {
            min: if other.min < self.min { other.min } else { self.min },
            max: if other.max > self.max { other.max } else { self.max },
        }
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl Interval<f64> {
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }
}

impl TimeWindow {
    /// The length of the window in whole milliseconds, never negative.
    pub fn duration_ms(&self) -> i64 {
        i64::max((self.max - self.min).num_milliseconds(), 0)
    }

    /// The fraction of the window elapsed at `time`, clamped to `[0, 1]`.
    ///
    /// Windows shorter than `min_ms` are treated as `min_ms` long.
    pub fn fraction_at(&self, time: NaiveDateTime, min_ms: i64) -> f64 {
        let span = i64::max(self.duration_ms(), min_ms) as f64;
        let elapsed = (time - self.min).num_milliseconds() as f64;
        (elapsed / span).clamp(0.0, 1.0)
    }

    /// The time at the given fraction of the window, truncated to the millisecond.
    pub fn time_at(&self, fraction: f64) -> NaiveDateTime {
        let offset = (fraction * self.duration_ms() as f64) as i64;
        self.min + Duration::milliseconds(offset)
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
