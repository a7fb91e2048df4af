mod lifespan;

pub use lifespan::{Lifespan, TransitionError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary amount (reserves, swap inputs/outputs, balances) - uses Decimal
/// for precision. Committed values are kept at [`AMOUNT_SCALE`] fractional
/// digits.
pub type Amount = Decimal;

/// Instantaneous or realized price ratio
pub type Price = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Fractional digits carried by committed amounts and reserves
pub const AMOUNT_SCALE: u32 = 8;

/// Fractional digits carried by the pool constant `K`
///
/// Wider than the reserve scale so that `K / reserve` does not lose the
/// precision the next swap depends on.
pub const K_SCALE: u32 = 16;

pub type ExperimentId = Uuid;
pub type GroupId = Uuid;
pub type RoundId = Uuid;
pub type CurrencyId = Uuid;
pub type UserId = Uuid;
pub type PlayerId = Uuid;
pub type TransactionId = Uuid;

/// Unique identifier for a pool (one live market per group per round)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(Uuid);

impl PoolId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for PoolId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
