//! Round lifecycle use case: pool initialization, start, end, update, delete.
//!
//! Starting and ending a round flip every pool of the round as one
//! all-or-nothing batch: every transition is validated on working copies
//! before anything is written, while all pool locks of the round are held.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::pool_locks::PoolLocks;
use crate::application::ports::{
    EventPublisher, ExperimentRepository, IdentityDirectory, LedgerRepository, PoolRepository,
    RoundRepository, StorageError,
};
use crate::domain::{
    Clock, ExperimentEvent, KnowledgeAssigner, PlayerBalance, PlayerCurrencyKnowledge, PlayerId,
    Pool, PoolError, PoolsInitializedEvent, Round, RoundId, RoundLifecycleEvent, RoundPatch,
    TransitionError,
};

/// Use case for round lifecycle transitions
pub struct RoundLifecycleUseCase<C, X, R, P, L, I, E>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    I: IdentityDirectory,
    E: EventPublisher,
{
    clock: Arc<C>,
    experiments: Arc<X>,
    rounds: Arc<R>,
    pools: Arc<P>,
    ledger: Arc<L>,
    identities: Arc<I>,
    events: Arc<E>,
    locks: Arc<PoolLocks>,
    assigner: KnowledgeAssigner,
}

impl<C, X, R, P, L, I, E> RoundLifecycleUseCase<C, X, R, P, L, I, E>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    I: IdentityDirectory,
    E: EventPublisher,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<C>,
        experiments: Arc<X>,
        rounds: Arc<R>,
        pools: Arc<P>,
        ledger: Arc<L>,
        identities: Arc<I>,
        events: Arc<E>,
        locks: Arc<PoolLocks>,
        assigner: KnowledgeAssigner,
    ) -> Self {
        Self {
            clock,
            experiments,
            rounds,
            pools,
            ledger,
            identities,
            events,
            locks,
            assigner,
        }
    }

    async fn load(&self, id: &RoundId) -> Result<Round, RoundLifecycleError> {
        self.rounds
            .get(id)
            .await?
            .ok_or(RoundLifecycleError::RoundNotFound(*id))
    }

    /// Create one inactive pool per group of the round's experiment
    ///
    /// Repeating the call is rejected: pools are created exactly once per
    /// round, like every other transition in the system.
    pub async fn initialize_pools(
        &self,
        round_id: RoundId,
    ) -> Result<Vec<Pool>, RoundLifecycleError> {
        let round = self.load(&round_id).await?;

        if round.lifespan.is_started() {
            return Err(RoundLifecycleError::Transition(
                TransitionError::AlreadyStarted,
            ));
        }
        if self.pools.exists_for_round(&round_id).await? {
            return Err(RoundLifecycleError::AlreadyInitialized(round_id));
        }

        let groups = self
            .experiments
            .groups_by_experiment(&round.experiment_id)
            .await?;

        let now = self.clock.now();
        let mut created = Vec::with_capacity(groups.len());
        for group in &groups {
            let pool = Pool::seed(
                round.id,
                group.id,
                round.initial_reserve_x,
                round.initial_reserve_y,
                now,
            );
            self.pools.save(pool.clone()).await?;
            created.push(pool);
        }

        info!(
            round_id = %round_id,
            pools = created.len(),
            reserve_x = %round.initial_reserve_x,
            reserve_y = %round.initial_reserve_y,
            "pools initialized"
        );
        self.events
            .publish(ExperimentEvent::PoolsInitialized(PoolsInitializedEvent {
                round_id,
                pool_ids: created.iter().map(|p| p.id).collect(),
                timestamp: now,
            }))
            .await;

        Ok(created)
    }

    /// Start the round: activate every pool, seed balances, assign knowledge
    pub async fn start(&self, round_id: RoundId) -> Result<Round, RoundLifecycleError> {
        let mut round = self.load(&round_id).await?;

        let pools = self.pools.by_round(&round_id).await?;
        if pools.is_empty() {
            return Err(RoundLifecycleError::NotInitialized(round_id));
        }
        let pool_ids: Vec<_> = pools.iter().map(|p| p.id).collect();
        let _guards = self.locks.acquire_all(&pool_ids).await;

        // Validate the whole batch on working copies before writing anything
        let now = self.clock.now();
        round.start(now)?;
        let mut activated = Vec::with_capacity(pools.len());
        for mut pool in pools {
            pool.activate(now)?;
            activated.push(pool);
        }

        // Round-start side effects: zero-or-endowed balances and one
        // knowledge row per player of each group
        let mut balances: Vec<PlayerBalance> = Vec::new();
        let mut knowledge: Vec<PlayerCurrencyKnowledge> = Vec::new();
        for pool in &activated {
            let players: Vec<PlayerId> = self
                .identities
                .players_in_group(&pool.group_id)
                .await?
                .iter()
                .map(|p| p.id)
                .collect();

            for player_id in &players {
                balances.push(PlayerBalance::new(
                    *player_id,
                    pool.id,
                    round.currency_x_id,
                    round.endowment_x,
                    now,
                ));
                balances.push(PlayerBalance::new(
                    *player_id,
                    pool.id,
                    round.currency_y_id,
                    round.endowment_y,
                    now,
                ));
            }

            for (player_id, revealed) in
                self.assigner
                    .assign(&players, round.currency_x_id, round.currency_y_id)
            {
                knowledge.push(PlayerCurrencyKnowledge::new(player_id, pool.id, revealed, now));
            }
        }

        // Commit the validated batch
        self.rounds.save(round.clone()).await?;
        for pool in activated.iter().cloned() {
            self.pools.save(pool).await?;
        }
        for balance in balances {
            self.ledger.save_balance(balance).await?;
        }
        for row in knowledge {
            self.ledger.save_knowledge(row).await?;
        }

        info!(round_id = %round_id, pools = activated.len(), "round started");
        self.events
            .publish(ExperimentEvent::RoundStarted(RoundLifecycleEvent {
                round_id,
                pool_count: activated.len(),
                timestamp: now,
            }))
            .await;

        Ok(round)
    }

    /// End the round: close every pool
    pub async fn end(&self, round_id: RoundId) -> Result<Round, RoundLifecycleError> {
        let mut round = self.load(&round_id).await?;

        let pools = self.pools.by_round(&round_id).await?;
        let pool_ids: Vec<_> = pools.iter().map(|p| p.id).collect();
        let _guards = self.locks.acquire_all(&pool_ids).await;

        let now = self.clock.now();
        round.end(now)?;
        let mut closed = Vec::with_capacity(pools.len());
        for mut pool in pools {
            pool.close(now)?;
            closed.push(pool);
        }

        self.rounds.save(round.clone()).await?;
        for pool in closed.iter().cloned() {
            self.pools.save(pool).await?;
        }

        info!(round_id = %round_id, pools = closed.len(), "round ended");
        self.events
            .publish(ExperimentEvent::RoundEnded(RoundLifecycleEvent {
                round_id,
                pool_count: closed.len(),
                timestamp: now,
            }))
            .await;

        Ok(round)
    }

    /// Update round configuration; frozen once pools exist
    pub async fn update(
        &self,
        round_id: RoundId,
        patch: RoundPatch,
    ) -> Result<Round, RoundLifecycleError> {
        let mut round = self.load(&round_id).await?;

        if self.pools.exists_for_round(&round_id).await? {
            return Err(RoundLifecycleError::AlreadyInitialized(round_id));
        }

        round.apply(patch)?;
        self.rounds.save(round.clone()).await?;
        Ok(round)
    }

    /// Delete a round before it starts, removing any initialized pools
    pub async fn delete(&self, round_id: RoundId) -> Result<(), RoundLifecycleError> {
        let round = self.load(&round_id).await?;
        if round.lifespan.is_started() {
            return Err(RoundLifecycleError::Transition(
                TransitionError::AlreadyStarted,
            ));
        }

        let pools = self.pools.by_round(&round_id).await?;
        let pool_ids: Vec<_> = pools.iter().map(|p| p.id).collect();
        let _guards = self.locks.acquire_all(&pool_ids).await;

        self.ledger.remove_by_pools(&pool_ids).await?;
        let removed = self.pools.remove_by_rounds(&[round_id]).await?;
        self.rounds.remove(&round_id).await?;
        self.locks.forget(&removed);

        info!(round_id = %round_id, pools = removed.len(), "round deleted");
        Ok(())
    }
}

/// Errors for round lifecycle transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundLifecycleError {
    #[error("round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("pools already initialized for round {0}")]
    AlreadyInitialized(RoundId),

    #[error("pools not initialized for round {0}")]
    NotInitialized(RoundId),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Invalid(#[from] crate::domain::RoundError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
