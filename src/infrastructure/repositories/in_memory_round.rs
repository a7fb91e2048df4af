//! In-memory round repository implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{RoundReader, RoundWriter, StorageResult};
use crate::domain::{ExperimentId, Round, RoundId};

/// Thread-safe round template storage backed by DashMap
pub struct InMemoryRoundRepository {
    rounds: Arc<DashMap<RoundId, Round>>,
}

impl InMemoryRoundRepository {
    pub fn new() -> Self {
        Self {
            rounds: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryRoundRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryRoundRepository {
    fn clone(&self) -> Self {
        Self {
            rounds: Arc::clone(&self.rounds),
        }
    }
}

#[async_trait]
impl RoundReader for InMemoryRoundRepository {
    async fn get(&self, id: &RoundId) -> StorageResult<Option<Round>> {
        Ok(self.rounds.get(id).map(|r| r.value().clone()))
    }

    async fn by_experiment(&self, experiment_id: &ExperimentId) -> StorageResult<Vec<Round>> {
        let mut rounds: Vec<Round> = self
            .rounds
            .iter()
            .filter(|r| &r.experiment_id == experiment_id)
            .map(|r| r.value().clone())
            .collect();
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }
}

#[async_trait]
impl RoundWriter for InMemoryRoundRepository {
    async fn save(&self, round: Round) -> StorageResult<()> {
        self.rounds.insert(round.id, round);
        Ok(())
    }

    async fn remove(&self, id: &RoundId) -> StorageResult<bool> {
        Ok(self.rounds.remove(id).is_some())
    }

    async fn remove_by_experiment(
        &self,
        experiment_id: &ExperimentId,
    ) -> StorageResult<Vec<RoundId>> {
        let ids: Vec<RoundId> = self
            .rounds
            .iter()
            .filter(|r| &r.experiment_id == experiment_id)
            .map(|r| r.id)
            .collect();
        for id in &ids {
            self.rounds.remove(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoundConfig;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn round(experiment_id: ExperimentId, number: u32) -> Round {
        Round::new(
            experiment_id,
            RoundConfig {
                round_number: number,
                is_training_round: false,
                counts_for_payment: true,
                duration_minutes: 10,
                currency_x_id: Uuid::new_v4(),
                currency_y_id: Uuid::new_v4(),
                external_price_x: dec!(1),
                external_price_y: dec!(1),
                initial_reserve_x: dec!(1000),
                initial_reserve_y: dec!(1000),
                endowment_x: dec!(0),
                endowment_y: dec!(0),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_by_experiment_ordered_by_number() {
        let repo = InMemoryRoundRepository::new();
        let exp = Uuid::new_v4();
        for n in [3, 1, 2] {
            repo.save(round(exp, n)).await.unwrap();
        }
        repo.save(round(Uuid::new_v4(), 9)).await.unwrap();

        let numbers: Vec<u32> = repo
            .by_experiment(&exp)
            .await
            .unwrap()
            .iter()
            .map(|r| r.round_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_remove_by_experiment() {
        let repo = InMemoryRoundRepository::new();
        let exp = Uuid::new_v4();
        repo.save(round(exp, 1)).await.unwrap();
        repo.save(round(exp, 2)).await.unwrap();

        let removed = repo.remove_by_experiment(&exp).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(repo.by_experiment(&exp).await.unwrap().is_empty());
    }
}
