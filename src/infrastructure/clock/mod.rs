//! Clock implementations.

use chrono::{Duration, Utc};
use std::sync::Mutex;

use crate::domain::{Clock, Timestamp};

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Controllable clock for tests and simulations
///
/// Time only moves when `advance` is called.
pub struct SimulationClock {
    current: Mutex<Timestamp>,
}

impl SimulationClock {
    /// Start frozen at the current wall-clock instant
    pub fn fixed() -> Self {
        Self {
            current: Mutex::new(Utc::now()),
        }
    }

    /// Start frozen at a specific instant
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            current: Mutex::new(timestamp),
        }
    }

    /// Move time forward
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().expect("clock mutex poisoned");
        *current += duration;
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().expect("clock mutex poisoned")
    }
}
