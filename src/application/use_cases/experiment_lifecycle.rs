//! Experiment lifecycle use case: start, end, rename, delete.
//!
//! Deletion is an explicit transactional fan-out across every store that
//! holds data for the experiment, taken under all of its pool locks so no
//! partially-deleted state is observable.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::pool_locks::PoolLocks;
use crate::application::ports::{
    EventPublisher, ExperimentRepository, LedgerRepository, PoolRepository, RoundRepository,
    StorageError,
};
use crate::domain::{
    Clock, Experiment, ExperimentDeletedEvent, ExperimentError, ExperimentEvent, ExperimentId,
    ExperimentLifecycleEvent, PoolId, TransitionError,
};

/// Use case for experiment lifecycle transitions
pub struct ExperimentLifecycleUseCase<C, X, R, P, L, E>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    E: EventPublisher,
{
    clock: Arc<C>,
    experiments: Arc<X>,
    rounds: Arc<R>,
    pools: Arc<P>,
    ledger: Arc<L>,
    events: Arc<E>,
    locks: Arc<PoolLocks>,
}

impl<C, X, R, P, L, E> ExperimentLifecycleUseCase<C, X, R, P, L, E>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
    E: EventPublisher,
{
    pub fn new(
        clock: Arc<C>,
        experiments: Arc<X>,
        rounds: Arc<R>,
        pools: Arc<P>,
        ledger: Arc<L>,
        events: Arc<E>,
        locks: Arc<PoolLocks>,
    ) -> Self {
        Self {
            clock,
            experiments,
            rounds,
            pools,
            ledger,
            events,
            locks,
        }
    }

    async fn load(&self, id: &ExperimentId) -> Result<Experiment, ExperimentLifecycleError> {
        self.experiments
            .get(id)
            .await?
            .ok_or(ExperimentLifecycleError::ExperimentNotFound(*id))
    }

    /// Mark an experiment as started
    pub async fn start(&self, id: ExperimentId) -> Result<Experiment, ExperimentLifecycleError> {
        let mut experiment = self.load(&id).await?;
        let now = self.clock.now();
        experiment.start(now)?;
        self.experiments.save(experiment.clone()).await?;

        info!(experiment_id = %id, "experiment started");
        self.events
            .publish(ExperimentEvent::ExperimentStarted(
                ExperimentLifecycleEvent {
                    experiment_id: id,
                    timestamp: now,
                },
            ))
            .await;

        Ok(experiment)
    }

    /// Mark an experiment as ended
    pub async fn end(&self, id: ExperimentId) -> Result<Experiment, ExperimentLifecycleError> {
        let mut experiment = self.load(&id).await?;
        let now = self.clock.now();
        experiment.end(now)?;
        self.experiments.save(experiment.clone()).await?;

        info!(experiment_id = %id, "experiment ended");
        self.events
            .publish(ExperimentEvent::ExperimentEnded(ExperimentLifecycleEvent {
                experiment_id: id,
                timestamp: now,
            }))
            .await;

        Ok(experiment)
    }

    /// Rename an experiment (only before it starts)
    pub async fn rename(
        &self,
        id: ExperimentId,
        name: impl Into<String>,
    ) -> Result<Experiment, ExperimentLifecycleError> {
        let mut experiment = self.load(&id).await?;
        experiment.rename(name)?;
        self.experiments.save(experiment.clone()).await?;
        Ok(experiment)
    }

    /// Delete an experiment and everything created under it
    pub async fn delete(&self, id: ExperimentId) -> Result<(), ExperimentLifecycleError> {
        // Existence check up front so an unknown id is an error, not a no-op
        self.load(&id).await?;

        let rounds = self.rounds.by_experiment(&id).await?;
        let round_ids: Vec<_> = rounds.iter().map(|r| r.id).collect();

        let mut pool_ids: Vec<PoolId> = Vec::new();
        for round_id in &round_ids {
            for pool in self.pools.by_round(round_id).await? {
                pool_ids.push(pool.id);
            }
        }

        // Hold every pool of the experiment so no swap can interleave with
        // the fan-out
        let _guards = self.locks.acquire_all(&pool_ids).await;

        self.ledger.remove_by_pools(&pool_ids).await?;
        let removed_pools = self.pools.remove_by_rounds(&round_ids).await?;
        let removed_rounds = self.rounds.remove_by_experiment(&id).await?;
        if !self.experiments.remove(&id).await? {
            warn!(experiment_id = %id, "experiment vanished mid-deletion");
        }
        self.locks.forget(&removed_pools);

        let now = self.clock.now();
        info!(
            experiment_id = %id,
            rounds = removed_rounds.len(),
            pools = removed_pools.len(),
            "experiment deleted"
        );
        self.events
            .publish(ExperimentEvent::ExperimentDeleted(ExperimentDeletedEvent {
                experiment_id: id,
                rounds_removed: removed_rounds.len(),
                pools_removed: removed_pools.len(),
                timestamp: now,
            }))
            .await;

        Ok(())
    }
}

/// Errors for experiment lifecycle transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExperimentLifecycleError {
    #[error("experiment not found: {0}")]
    ExperimentNotFound(ExperimentId),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Invalid(#[from] ExperimentError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
