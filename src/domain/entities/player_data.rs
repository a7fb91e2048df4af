//! Per-player, per-pool data: balances and currency knowledge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{AMOUNT_SCALE, Amount, CurrencyId, PlayerId, PoolId, Timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("insufficient balance: {available} available, {requested} requested")]
    Insufficient {
        available: Amount,
        requested: Amount,
    },

    #[error("amount must be non-negative")]
    NegativeAmount,
}

/// Currency holdings of one player inside one pool
///
/// Never negative; every mutation comes from a committed swap or a
/// round-start endowment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBalance {
    pub player_id: PlayerId,
    pub pool_id: PoolId,
    pub currency_id: CurrencyId,
    pub balance: Amount,
    pub updated_at: Timestamp,
}

impl PlayerBalance {
    pub fn new(
        player_id: PlayerId,
        pool_id: PoolId,
        currency_id: CurrencyId,
        balance: Amount,
        now: Timestamp,
    ) -> Self {
        Self {
            player_id,
            pool_id,
            currency_id,
            balance: balance.round_dp(AMOUNT_SCALE),
            updated_at: now,
        }
    }

    pub fn credit(&mut self, amount: Amount, now: Timestamp) -> Result<(), BalanceError> {
        if amount < Decimal::ZERO {
            return Err(BalanceError::NegativeAmount);
        }
        self.balance = (self.balance + amount).round_dp(AMOUNT_SCALE);
        self.updated_at = now;
        Ok(())
    }

    pub fn debit(&mut self, amount: Amount, now: Timestamp) -> Result<(), BalanceError> {
        if amount < Decimal::ZERO {
            return Err(BalanceError::NegativeAmount);
        }
        if self.balance < amount {
            return Err(BalanceError::Insufficient {
                available: self.balance,
                requested: amount,
            });
        }
        self.balance = (self.balance - amount).round_dp(AMOUNT_SCALE);
        self.updated_at = now;
        Ok(())
    }
}

/// The one currency whose external reference price a player may observe in a
/// given pool. Written once per (player, pool), immutable for the round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCurrencyKnowledge {
    pub player_id: PlayerId,
    pub pool_id: PoolId,
    pub revealed_currency_id: CurrencyId,
    pub created_at: Timestamp,
}

impl PlayerCurrencyKnowledge {
    pub fn new(
        player_id: PlayerId,
        pool_id: PoolId,
        revealed_currency_id: CurrencyId,
        now: Timestamp,
    ) -> Self {
        Self {
            player_id,
            pool_id,
            revealed_currency_id,
            created_at: now,
        }
    }
}
