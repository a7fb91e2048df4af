//! Read accessors for the boundary layer, with skip/limit pagination.

use std::sync::Arc;

use crate::application::ports::{
    ExperimentRepository, LedgerRepository, PoolRepository, RoundRepository, StorageResult,
};
use crate::domain::{
    CurrencyId, Experiment, ExperimentId, Group, GroupId, PlayerBalance, PlayerCurrencyKnowledge,
    PlayerId, Pool, PoolId, Round, RoundId, Transaction,
};

/// One page of results plus the total row count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Read-only accessors over the experiment stores
pub struct QueryUseCase<X, R, P, L>
where
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
{
    experiments: Arc<X>,
    rounds: Arc<R>,
    pools: Arc<P>,
    ledger: Arc<L>,
}

impl<X, R, P, L> QueryUseCase<X, R, P, L>
where
    X: ExperimentRepository,
    R: RoundRepository,
    P: PoolRepository,
    L: LedgerRepository,
{
    pub fn new(experiments: Arc<X>, rounds: Arc<R>, pools: Arc<P>, ledger: Arc<L>) -> Self {
        Self {
            experiments,
            rounds,
            pools,
            ledger,
        }
    }

    pub async fn experiment(&self, id: &ExperimentId) -> StorageResult<Option<Experiment>> {
        self.experiments.get(id).await
    }

    pub async fn experiments(&self, skip: usize, limit: usize) -> StorageResult<Page<Experiment>> {
        let (items, total) = self.experiments.list(skip, limit).await?;
        Ok(Page { items, total })
    }

    pub async fn groups(&self, experiment_id: &ExperimentId) -> StorageResult<Vec<Group>> {
        self.experiments.groups_by_experiment(experiment_id).await
    }

    pub async fn round(&self, id: &RoundId) -> StorageResult<Option<Round>> {
        self.rounds.get(id).await
    }

    pub async fn rounds(&self, experiment_id: &ExperimentId) -> StorageResult<Vec<Round>> {
        self.rounds.by_experiment(experiment_id).await
    }

    pub async fn pool(&self, id: &PoolId) -> StorageResult<Option<Pool>> {
        self.pools.get(id).await
    }

    pub async fn pools(&self, round_id: &RoundId) -> StorageResult<Vec<Pool>> {
        self.pools.by_round(round_id).await
    }

    pub async fn pool_for_group(
        &self,
        round_id: &RoundId,
        group_id: &GroupId,
    ) -> StorageResult<Option<Pool>> {
        self.pools.by_round_and_group(round_id, group_id).await
    }

    pub async fn transactions_by_pool(
        &self,
        pool_id: &PoolId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<Page<Transaction>> {
        let (items, total) = self.ledger.by_pool(pool_id, skip, limit).await?;
        Ok(Page { items, total })
    }

    pub async fn transactions_by_player(
        &self,
        player_id: &PlayerId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<Page<Transaction>> {
        let (items, total) = self.ledger.by_player(player_id, skip, limit).await?;
        Ok(Page { items, total })
    }

    pub async fn balance(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
        currency_id: &CurrencyId,
    ) -> StorageResult<Option<PlayerBalance>> {
        self.ledger
            .get_balance(player_id, pool_id, currency_id)
            .await
    }

    pub async fn balances_by_pool(&self, pool_id: &PoolId) -> StorageResult<Vec<PlayerBalance>> {
        self.ledger.balances_by_pool(pool_id).await
    }

    pub async fn balances_by_player(
        &self,
        player_id: &PlayerId,
    ) -> StorageResult<Vec<PlayerBalance>> {
        self.ledger.balances_by_player(player_id).await
    }

    pub async fn knowledge(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
    ) -> StorageResult<Option<PlayerCurrencyKnowledge>> {
        self.ledger.get_knowledge(player_id, pool_id).await
    }

    pub async fn knowledge_by_pool(
        &self,
        pool_id: &PoolId,
    ) -> StorageResult<Vec<PlayerCurrencyKnowledge>> {
        self.ledger.knowledge_by_pool(pool_id).await
    }
}
