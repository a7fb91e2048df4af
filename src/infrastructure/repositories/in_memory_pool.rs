//! In-memory pool repository implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{PoolReader, PoolWriter, StorageResult};
use crate::domain::{GroupId, Pool, PoolId, RoundId};

/// Thread-safe pool storage backed by DashMap
///
/// The (round, group) pair is indexed separately to keep composite lookups
/// O(1) and to enforce one pool per group per round.
pub struct InMemoryPoolRepository {
    pools: Arc<DashMap<PoolId, Pool>>,
    /// Index: (round, group) -> PoolId
    round_group_index: Arc<DashMap<(RoundId, GroupId), PoolId>>,
}

impl InMemoryPoolRepository {
    pub fn new() -> Self {
        Self {
            pools: Arc::new(DashMap::new()),
            round_group_index: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryPoolRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryPoolRepository {
    fn clone(&self) -> Self {
        Self {
            pools: Arc::clone(&self.pools),
            round_group_index: Arc::clone(&self.round_group_index),
        }
    }
}

#[async_trait]
impl PoolReader for InMemoryPoolRepository {
    async fn get(&self, id: &PoolId) -> StorageResult<Option<Pool>> {
        Ok(self.pools.get(id).map(|p| p.value().clone()))
    }

    async fn by_round(&self, round_id: &RoundId) -> StorageResult<Vec<Pool>> {
        let mut pools: Vec<Pool> = self
            .pools
            .iter()
            .filter(|p| &p.round_id == round_id)
            .map(|p| p.value().clone())
            .collect();
        pools.sort_by_key(|p| p.id);
        Ok(pools)
    }

    async fn by_round_and_group(
        &self,
        round_id: &RoundId,
        group_id: &GroupId,
    ) -> StorageResult<Option<Pool>> {
        let Some(pool_id) = self.round_group_index.get(&(*round_id, *group_id)) else {
            return Ok(None);
        };
        Ok(self.pools.get(pool_id.value()).map(|p| p.value().clone()))
    }

    async fn exists_for_round(&self, round_id: &RoundId) -> StorageResult<bool> {
        Ok(self.pools.iter().any(|p| &p.round_id == round_id))
    }
}

#[async_trait]
impl PoolWriter for InMemoryPoolRepository {
    async fn save(&self, pool: Pool) -> StorageResult<()> {
        self.round_group_index
            .insert((pool.round_id, pool.group_id), pool.id);
        self.pools.insert(pool.id, pool);
        Ok(())
    }

    async fn remove_by_rounds(&self, round_ids: &[RoundId]) -> StorageResult<Vec<PoolId>> {
        let ids: Vec<PoolId> = self
            .pools
            .iter()
            .filter(|p| round_ids.contains(&p.round_id))
            .map(|p| p.id)
            .collect();
        for id in &ids {
            if let Some((_, pool)) = self.pools.remove(id) {
                self.round_group_index
                    .remove(&(pool.round_id, pool.group_id));
            }
        }
        Ok(ids)
    }
}
