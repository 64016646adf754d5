//! Lap timing for the coordinator's phases.

use std::time::{Duration, Instant};

use tracing::info;

pub struct Stopwatch {
    last: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous lap (or the start), logged under `label`.
    pub fn lap(&mut self, label: &str) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last;
        info!(elapsed_ms = elapsed.as_millis() as u64, "{}", label);
        self.last = now;
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}
