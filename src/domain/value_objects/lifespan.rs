//! Once-only start/end window shared by experiments, rounds, and pools.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Timestamp;

/// Errors for lifecycle transitions that fire more than once or out of order
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("already started")]
    AlreadyStarted,

    #[error("not started")]
    NotStarted,

    #[error("already ended")]
    AlreadyEnded,
}

/// A `created -> started -> ended` window where each transition happens at
/// most once and ending requires a prior start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespan {
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

impl Lifespan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the start time. Fails if already started.
    pub fn start(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        if self.started_at.is_some() {
            return Err(TransitionError::AlreadyStarted);
        }
        self.started_at = Some(now);
        Ok(())
    }

    /// Stamp the end time. Fails if never started or already ended.
    pub fn end(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        if self.started_at.is_none() {
            return Err(TransitionError::NotStarted);
        }
        if self.ended_at.is_some() {
            return Err(TransitionError::AlreadyEnded);
        }
        self.ended_at = Some(now);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Started and not yet ended
    pub fn is_running(&self) -> bool {
        self.is_started() && !self.is_ended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_start_once() {
        let mut span = Lifespan::new();
        assert!(!span.is_started());

        span.start(Utc::now()).unwrap();
        assert!(span.is_started());
        assert!(span.is_running());

        assert_eq!(span.start(Utc::now()), Err(TransitionError::AlreadyStarted));
    }

    #[test]
    fn test_end_requires_start() {
        let mut span = Lifespan::new();
        assert_eq!(span.end(Utc::now()), Err(TransitionError::NotStarted));

        span.start(Utc::now()).unwrap();
        span.end(Utc::now()).unwrap();
        assert!(span.is_ended());
        assert!(!span.is_running());

        assert_eq!(span.end(Utc::now()), Err(TransitionError::AlreadyEnded));
    }
}
