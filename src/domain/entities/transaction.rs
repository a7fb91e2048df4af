//! Append-only swap transaction record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    AMOUNT_SCALE, Amount, CurrencyId, PlayerId, PoolId, Price, Timestamp, TransactionId,
};

/// Record of one executed swap
///
/// Never mutated or deleted after creation; the ledger is the audit trail of
/// the experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub pool_id: PoolId,
    pub player_id: PlayerId,
    pub currency_in_id: CurrencyId,
    pub amount_in: Amount,
    pub currency_out_id: CurrencyId,
    pub amount_out: Amount,
    /// Realized price: amount_out / amount_in
    pub price_ratio: Price,
    pub has_completed: bool,
    pub created_at: Timestamp,
}

impl Transaction {
    pub fn record(
        pool_id: PoolId,
        player_id: PlayerId,
        currency_in_id: CurrencyId,
        amount_in: Amount,
        currency_out_id: CurrencyId,
        amount_out: Amount,
        now: Timestamp,
    ) -> Self {
        // Zero input cannot reach the ledger through the engine; keep the
        // ratio total anyway.
        let price_ratio = if amount_in.is_zero() {
            Decimal::ZERO
        } else {
            (amount_out / amount_in).round_dp(AMOUNT_SCALE)
        };

        Self {
            id: uuid::Uuid::new_v4(),
            pool_id,
            player_id,
            currency_in_id,
            amount_in,
            currency_out_id,
            amount_out,
            price_ratio,
            has_completed: true,
            created_at: now,
        }
    }
}
