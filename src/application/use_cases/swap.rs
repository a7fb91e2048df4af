//! Swap use case: the single write path against a live pool.
//!
//! Acquires the pool's exclusive scope, validates everything on working
//! copies, then commits reserve mutation, ledger append, and both balance
//! updates together. No partial effect is observable on any failure path.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::pool_locks::PoolLocks;
use crate::application::ports::{
    EventPublisher, IdentityDirectory, LedgerRepository, PoolRepository, RoundRepository,
    StorageError,
};
use crate::domain::{
    Amount, Clock, ExperimentEvent, PlayerBalance, PlayerId, PoolError, PoolId, Price, RoundId,
    SwapDirection, SwapExecutedEvent, Transaction, TransactionId, UserId,
};

/// Command to execute a swap
#[derive(Debug, Clone)]
pub struct SwapCommand {
    pub pool_id: PoolId,
    pub direction: SwapDirection,
    pub amount_in: Amount,
    /// Slippage guard: the whole swap is discarded when the computed output
    /// falls short
    pub min_amount_out: Option<Amount>,
}

/// Receipt for a committed swap
#[derive(Debug, Clone)]
pub struct SwapReceipt {
    pub transaction_id: TransactionId,
    pub amount_out: Amount,
    pub price_ratio: Price,
    pub fee_amount: Amount,
}

/// Preview of a swap against current reserves
#[derive(Debug, Clone)]
pub struct SwapQuote {
    pub amount_out: Amount,
    pub fee_amount: Amount,
}

/// Use case for executing swaps
pub struct SwapUseCase<C, R, P, L, I, E>
where
    C: Clock,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    I: IdentityDirectory,
    E: EventPublisher,
{
    clock: Arc<C>,
    rounds: Arc<R>,
    pools: Arc<P>,
    ledger: Arc<L>,
    identities: Arc<I>,
    events: Arc<E>,
    locks: Arc<PoolLocks>,
}

impl<C, R, P, L, I, E> SwapUseCase<C, R, P, L, I, E>
where
    C: Clock,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    I: IdentityDirectory,
    E: EventPublisher,
{
    pub fn new(
        clock: Arc<C>,
        rounds: Arc<R>,
        pools: Arc<P>,
        ledger: Arc<L>,
        identities: Arc<I>,
        events: Arc<E>,
        locks: Arc<PoolLocks>,
    ) -> Self {
        Self {
            clock,
            rounds,
            pools,
            ledger,
            identities,
            events,
            locks,
        }
    }

    pub async fn execute(
        &self,
        player_id: PlayerId,
        command: SwapCommand,
    ) -> Result<SwapReceipt, SwapError> {
        let player = self
            .identities
            .get(&player_id)
            .await?
            .ok_or(SwapError::PlayerNotFound(player_id))?;
        if !player.is_player() {
            return Err(SwapError::NotAPlayer(player_id));
        }

        // At most one in-flight mutation per pool: everything below happens
        // inside the pool's exclusive scope
        let _guard = self.locks.acquire(command.pool_id).await;

        let pool = self
            .pools
            .get(&command.pool_id)
            .await?
            .ok_or(SwapError::PoolNotFound(command.pool_id))?;
        if player.group_id() != Some(pool.group_id) {
            return Err(SwapError::NotInGroup {
                player_id,
                pool_id: pool.id,
            });
        }
        let round = self
            .rounds
            .get(&pool.round_id)
            .await?
            .ok_or(SwapError::RoundNotFound(pool.round_id))?;

        let (currency_in, currency_out) = match command.direction {
            SwapDirection::XForY => (round.currency_x_id, round.currency_y_id),
            SwapDirection::YForX => (round.currency_y_id, round.currency_x_id),
        };

        let now = self.clock.now();

        // Work on copies; nothing is saved until every check has passed
        let mut balance_in = self
            .ledger
            .get_balance(&player_id, &pool.id, &currency_in)
            .await?
            .unwrap_or_else(|| PlayerBalance::new(player_id, pool.id, currency_in, Amount::ZERO, now));
        if balance_in.balance < command.amount_in {
            return Err(SwapError::InsufficientBalance {
                available: balance_in.balance,
                requested: command.amount_in,
            });
        }

        let mut working = pool.clone();
        let outcome = working.swap(command.amount_in, command.direction)?;

        if let Some(min) = command.min_amount_out {
            if outcome.amount_out < min {
                debug!(
                    pool_id = %pool.id,
                    wanted = %min,
                    got = %outcome.amount_out,
                    "swap discarded on slippage"
                );
                return Err(SwapError::SlippageExceeded {
                    wanted: min,
                    got: outcome.amount_out,
                });
            }
        }

        balance_in
            .debit(command.amount_in, now)
            .map_err(|_| SwapError::InsufficientBalance {
                available: balance_in.balance,
                requested: command.amount_in,
            })?;
        let mut balance_out = self
            .ledger
            .get_balance(&player_id, &pool.id, &currency_out)
            .await?
            .unwrap_or_else(|| {
                PlayerBalance::new(player_id, pool.id, currency_out, Amount::ZERO, now)
            });
        balance_out
            .credit(outcome.amount_out, now)
            .map_err(|_| SwapError::Pool(PoolError::InvalidAmount))?;

        let transaction = Transaction::record(
            pool.id,
            player_id,
            currency_in,
            outcome.amount_in,
            currency_out,
            outcome.amount_out,
            now,
        );
        let receipt = SwapReceipt {
            transaction_id: transaction.id,
            amount_out: outcome.amount_out,
            price_ratio: transaction.price_ratio,
            fee_amount: outcome.fee_amount,
        };

        // Commit: reserve mutation, ledger append, and both balance rows
        // land together under the pool lock
        self.pools.save(working).await?;
        self.ledger.append(transaction.clone()).await?;
        self.ledger.save_balance(balance_in).await?;
        self.ledger.save_balance(balance_out).await?;

        info!(
            pool_id = %pool.id,
            player_id = %player_id,
            direction = ?command.direction,
            amount_in = %outcome.amount_in,
            amount_out = %outcome.amount_out,
            "swap committed"
        );
        self.events
            .publish(ExperimentEvent::SwapExecuted(SwapExecutedEvent {
                transaction_id: transaction.id,
                pool_id: pool.id,
                player_id,
                currency_in_id: currency_in,
                amount_in: outcome.amount_in,
                currency_out_id: currency_out,
                amount_out: outcome.amount_out,
                price_ratio: transaction.price_ratio,
                timestamp: now,
            }))
            .await;

        Ok(receipt)
    }

    /// Preview a swap against current reserves without executing it
    pub async fn quote(&self, command: &SwapCommand) -> Result<SwapQuote, SwapError> {
        let pool = self
            .pools
            .get(&command.pool_id)
            .await?
            .ok_or(SwapError::PoolNotFound(command.pool_id))?;

        let outcome = pool.quote(command.amount_in, command.direction)?;
        Ok(SwapQuote {
            amount_out: outcome.amount_out,
            fee_amount: outcome.fee_amount,
        })
    }
}

/// Errors that can occur during a swap
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("player not found: {0}")]
    PlayerNotFound(UserId),

    #[error("user is not a player: {0}")]
    NotAPlayer(UserId),

    #[error("player {player_id} does not belong to the group of pool {pool_id}")]
    NotInGroup { player_id: PlayerId, pool_id: PoolId },

    #[error("pool not found: {0}")]
    PoolNotFound(PoolId),

    #[error("round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        available: Amount,
        requested: Amount,
    },

    #[error("slippage exceeded: wanted at least {wanted}, got {got}")]
    SlippageExceeded { wanted: Amount, got: Amount },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
