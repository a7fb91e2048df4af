//! Port for experiment and group storage.

use async_trait::async_trait;

use crate::application::ports::StorageResult;
use crate::domain::{Experiment, ExperimentId, Group, GroupId};

/// Read operations for experiments and their groups
#[async_trait]
pub trait ExperimentReader: Send + Sync {
    /// Get an experiment by ID
    async fn get(&self, id: &ExperimentId) -> StorageResult<Option<Experiment>>;

    /// List experiments with pagination; returns (page, total count)
    async fn list(&self, skip: usize, limit: usize) -> StorageResult<(Vec<Experiment>, usize)>;

    /// Get a group by ID
    async fn get_group(&self, id: &GroupId) -> StorageResult<Option<Group>>;

    /// All groups of an experiment, ordered by group number
    async fn groups_by_experiment(&self, experiment_id: &ExperimentId)
    -> StorageResult<Vec<Group>>;
}

/// Write operations for experiments and their groups
#[async_trait]
pub trait ExperimentWriter: Send + Sync {
    /// Save an experiment
    async fn save(&self, experiment: Experiment) -> StorageResult<()>;

    /// Save a batch of groups
    async fn save_groups(&self, groups: Vec<Group>) -> StorageResult<()>;

    /// Remove an experiment and its groups; false if the id was unknown
    async fn remove(&self, id: &ExperimentId) -> StorageResult<bool>;
}

/// Combined experiment repository trait
#[async_trait]
pub trait ExperimentRepository: ExperimentReader + ExperimentWriter {}

impl<T: ExperimentReader + ExperimentWriter> ExperimentRepository for T {}
