use std::time::{Duration, Instant};

/// Monotonic frame timer.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
}

impl FrameClock {
    /// Start the clock; the first `tick` measures from here.
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Time since the previous tick.
    pub fn tick_duration(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        delta
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_duration().as_secs_f32()
    }

    /// Re-baseline without reporting the elapsed time.
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
