//! Port for live pool storage.

use async_trait::async_trait;

use crate::application::ports::StorageResult;
use crate::domain::{GroupId, Pool, PoolId, RoundId};

/// Read operations for pools
#[async_trait]
pub trait PoolReader: Send + Sync {
    /// Get a pool by ID
    async fn get(&self, id: &PoolId) -> StorageResult<Option<Pool>>;

    /// All pools of a round, ordered by pool id
    async fn by_round(&self, round_id: &RoundId) -> StorageResult<Vec<Pool>>;

    /// The pool of one group in one round (composite uniqueness)
    async fn by_round_and_group(
        &self,
        round_id: &RoundId,
        group_id: &GroupId,
    ) -> StorageResult<Option<Pool>>;

    /// Whether any pool exists for the round
    async fn exists_for_round(&self, round_id: &RoundId) -> StorageResult<bool>;
}

/// Write operations for pools
#[async_trait]
pub trait PoolWriter: Send + Sync {
    /// Save a pool
    async fn save(&self, pool: Pool) -> StorageResult<()>;

    /// Remove every pool of the given rounds; returns the removed ids
    async fn remove_by_rounds(&self, round_ids: &[RoundId]) -> StorageResult<Vec<PoolId>>;
}

/// Combined pool repository trait
#[async_trait]
pub trait PoolRepository: PoolReader + PoolWriter {}

impl<T: PoolReader + PoolWriter> PoolRepository for T {}
