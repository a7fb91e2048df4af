//! Domain events emitted by the experiment core.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Amount, CurrencyId, ExperimentId, PlayerId, PoolId, Price, RoundId, Timestamp, TransactionId,
};

/// Domain events emitted by the experiment core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum ExperimentEvent {
    /// Experiment moved to its started state
    ExperimentStarted(ExperimentLifecycleEvent),
    /// Experiment moved to its ended state
    ExperimentEnded(ExperimentLifecycleEvent),
    /// Experiment and everything under it was removed
    ExperimentDeleted(ExperimentDeletedEvent),
    /// Pools were created for every group of a round
    PoolsInitialized(PoolsInitializedEvent),
    /// Every pool of the round flipped to active
    RoundStarted(RoundLifecycleEvent),
    /// Every pool of the round flipped to closed
    RoundEnded(RoundLifecycleEvent),
    /// A swap committed against a pool
    SwapExecuted(SwapExecutedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentLifecycleEvent {
    pub experiment_id: ExperimentId,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentDeletedEvent {
    pub experiment_id: ExperimentId,
    pub rounds_removed: usize,
    pub pools_removed: usize,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsInitializedEvent {
    pub round_id: RoundId,
    pub pool_ids: Vec<PoolId>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundLifecycleEvent {
    pub round_id: RoundId,
    pub pool_count: usize,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapExecutedEvent {
    pub transaction_id: TransactionId,
    pub pool_id: PoolId,
    pub player_id: PlayerId,
    pub currency_in_id: CurrencyId,
    pub amount_in: Amount,
    pub currency_out_id: CurrencyId,
    pub amount_out: Amount,
    pub price_ratio: Price,
    pub timestamp: Timestamp,
}
