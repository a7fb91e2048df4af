//! Port for round template storage.

use async_trait::async_trait;

use crate::application::ports::StorageResult;
use crate::domain::{ExperimentId, Round, RoundId};

/// Read operations for round templates
#[async_trait]
pub trait RoundReader: Send + Sync {
    /// Get a round by ID
    async fn get(&self, id: &RoundId) -> StorageResult<Option<Round>>;

    /// All rounds of an experiment, ordered by round number
    async fn by_experiment(&self, experiment_id: &ExperimentId) -> StorageResult<Vec<Round>>;
}

/// Write operations for round templates
#[async_trait]
pub trait RoundWriter: Send + Sync {
    /// Save a round
    async fn save(&self, round: Round) -> StorageResult<()>;

    /// Remove one round; false if the id was unknown
    async fn remove(&self, id: &RoundId) -> StorageResult<bool>;

    /// Remove every round of an experiment; returns the removed ids
    async fn remove_by_experiment(
        &self,
        experiment_id: &ExperimentId,
    ) -> StorageResult<Vec<RoundId>>;
}

/// Combined round repository trait
#[async_trait]
pub trait RoundRepository: RoundReader + RoundWriter {}

impl<T: RoundReader + RoundWriter> RoundRepository for T {}
