//! In-memory experiment repository implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{ExperimentReader, ExperimentWriter, StorageResult};
use crate::domain::{Experiment, ExperimentId, Group, GroupId};

/// Thread-safe experiment and group storage backed by DashMap
pub struct InMemoryExperimentRepository {
    experiments: Arc<DashMap<ExperimentId, Experiment>>,
    groups: Arc<DashMap<GroupId, Group>>,
}

impl InMemoryExperimentRepository {
    pub fn new() -> Self {
        Self {
            experiments: Arc::new(DashMap::new()),
            groups: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryExperimentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryExperimentRepository {
    fn clone(&self) -> Self {
        Self {
            experiments: Arc::clone(&self.experiments),
            groups: Arc::clone(&self.groups),
        }
    }
}

#[async_trait]
impl ExperimentReader for InMemoryExperimentRepository {
    async fn get(&self, id: &ExperimentId) -> StorageResult<Option<Experiment>> {
        Ok(self.experiments.get(id).map(|e| e.value().clone()))
    }

    async fn list(&self, skip: usize, limit: usize) -> StorageResult<(Vec<Experiment>, usize)> {
        let mut all: Vec<Experiment> = self
            .experiments
            .iter()
            .map(|e| e.value().clone())
            .collect();
        all.sort_by_key(|e| e.created_at);
        let total = all.len();
        Ok((all.into_iter().skip(skip).take(limit).collect(), total))
    }

    async fn get_group(&self, id: &GroupId) -> StorageResult<Option<Group>> {
        Ok(self.groups.get(id).map(|g| g.value().clone()))
    }

    async fn groups_by_experiment(
        &self,
        experiment_id: &ExperimentId,
    ) -> StorageResult<Vec<Group>> {
        let mut groups: Vec<Group> = self
            .groups
            .iter()
            .filter(|g| &g.experiment_id == experiment_id)
            .map(|g| g.value().clone())
            .collect();
        groups.sort_by_key(|g| g.group_number);
        Ok(groups)
    }
}

#[async_trait]
impl ExperimentWriter for InMemoryExperimentRepository {
    async fn save(&self, experiment: Experiment) -> StorageResult<()> {
        self.experiments.insert(experiment.id, experiment);
        Ok(())
    }

    async fn save_groups(&self, groups: Vec<Group>) -> StorageResult<()> {
        for group in groups {
            self.groups.insert(group.id, group);
        }
        Ok(())
    }

    async fn remove(&self, id: &ExperimentId) -> StorageResult<bool> {
        let removed = self.experiments.remove(id).is_some();
        self.groups.retain(|_, g| &g.experiment_id != id);
        Ok(removed)
    }
}
