use crate::clock::PROGRESS_MAX;
use std::time::Duration;

/// The real time taken to play the whole simulation at unit speed, in ms.
pub const FULL_SWEEP_MS: f64 = 60_000.0; // ms

/// Drives simulation progress in real time, like a media player.
#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    /// The current progress in `[0, PROGRESS_MAX]`.
    progress: f64,
    /// The playback speed multiplier.
    speed: f64,
    /// Whether to wrap back to the start after reaching the end.
    looping: bool,
    playing: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            progress: 0.0,
            speed: 1.0,
            looping: false,
            playing: false,
        }
    }
}

impl Playback {
    /// Creates a paused playback at the start.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the speed multiplier, e.g. `0.5`, `2.0` or `4.0`.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = f64::max(speed, 0.0);
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jumps directly to the given progress.
    pub fn seek(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, PROGRESS_MAX);
    }

    /// Advances playback by `dt` of real time and returns the new progress.
    ///
    /// On reaching the end, a looping playback wraps around to the start
    /// (which the simulation sees as a rewind); otherwise it stops at the end.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        if !self.playing {
            return self.progress;
        }
        let delta = dt.as_secs_f64() * 1000.0 / FULL_SWEEP_MS * PROGRESS_MAX * self.speed;
        let mut next = self.progress + delta;
        if next >= PROGRESS_MAX {
            if self.looping {
                next %= PROGRESS_MAX;
            } else {
                next = PROGRESS_MAX;
                self.playing = false;
            }
        }
        self.progress = next;
        next
    }
}
