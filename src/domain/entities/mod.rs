mod currency;
mod experiment;
mod player_data;
mod pool;
mod round;
mod transaction;
mod user;

pub use currency::Currency;
pub use experiment::{Experiment, ExperimentError, Group};
pub use player_data::{BalanceError, PlayerBalance, PlayerCurrencyKnowledge};
pub use pool::{Pool, PoolError, SwapDirection, SwapOutcome};
pub use round::{Round, RoundConfig, RoundError, RoundPatch};
pub use transaction::Transaction;
pub use user::{User, UserRole};
