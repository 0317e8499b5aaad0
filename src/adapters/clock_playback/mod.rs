//! Wall-clock playback primitive
//!
//! Stands in for a decoder-backed player: the position advances with real
//! time while playing and stops at the media duration.

use std::time::{Duration, Instant};

use crate::domain::model::MediaInfo;
use crate::ports::PlaybackPort;

/// Playback position driven by a monotonic clock
#[derive(Debug, Default)]
pub struct ClockPlayback {
    duration: Duration,
    base: Duration,
    started: Option<Instant>,
}

impl ClockPlayback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackPort for ClockPlayback {
    fn load(&mut self, media: &MediaInfo) {
        self.duration = media.duration;
        self.base = Duration::ZERO;
        self.started = None;
    }

    fn position(&self) -> Duration {
        let elapsed = self.started.map(|at| at.elapsed()).unwrap_or_default();
        (self.base + elapsed).min(self.duration)
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.started.is_some() && self.position() < self.duration
    }

    fn play(&mut self) {
        // Reaching the end leaves the clock running, so restart from there too
        if self.position() >= self.duration {
            self.base = Duration::ZERO;
            self.started = Some(Instant::now());
        } else if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base = self.position();
        self.started = None;
    }

    fn set_position(&mut self, position: Duration) {
        self.base = position.min(self.duration);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }
}
