//! Clock port.
//!
//! All lifecycle stamps and ledger timestamps flow through this trait so
//! that tests and simulations control time.

use crate::domain::value_objects::Timestamp;

/// Basic clock trait - provides current time
pub trait Clock: Send + Sync {
    /// Get current time from this clock's perspective
    fn now(&self) -> Timestamp;

    /// Get current time as milliseconds since Unix epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
