//! Experiment and Group entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{
    ExperimentId, GroupId, Lifespan, Timestamp, TransitionError, UserId,
};

/// Errors for experiment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("experiment needs at least one group")]
    NoGroups,

    #[error("experiment needs at least one player")]
    NoPlayers,

    #[error(
        "round counts are inconsistent: {training} training + {paid} paid rounds exceed {total} total"
    )]
    InconsistentRoundCounts {
        total: u32,
        training: u32,
        paid: u32,
    },

    #[error("experiment has already started")]
    AlreadyStarted,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Experiment definition and configuration
///
/// Owns its groups and round templates; deleting an experiment cascades to
/// everything created under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub name: String,
    pub admin_id: UserId,
    pub num_rounds: u32,
    pub num_training_rounds: u32,
    pub num_rounds_for_payment: u32,
    pub num_players: u32,
    pub num_groups: u32,
    #[serde(flatten)]
    pub lifespan: Lifespan,
    pub created_at: Timestamp,
}

impl Experiment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        admin_id: UserId,
        num_rounds: u32,
        num_training_rounds: u32,
        num_rounds_for_payment: u32,
        num_players: u32,
        num_groups: u32,
        now: Timestamp,
    ) -> Result<Self, ExperimentError> {
        if num_groups == 0 {
            return Err(ExperimentError::NoGroups);
        }
        if num_players == 0 {
            return Err(ExperimentError::NoPlayers);
        }
        if num_training_rounds + num_rounds_for_payment > num_rounds {
            return Err(ExperimentError::InconsistentRoundCounts {
                total: num_rounds,
                training: num_training_rounds,
                paid: num_rounds_for_payment,
            });
        }

        Ok(Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            admin_id,
            num_rounds,
            num_training_rounds,
            num_rounds_for_payment,
            num_players,
            num_groups,
            lifespan: Lifespan::new(),
            created_at: now,
        })
    }

    pub fn start(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.lifespan.start(now)
    }

    pub fn end(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.lifespan.end(now)
    }

    /// Configuration may change only before the experiment starts
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ExperimentError> {
        if self.lifespan.is_started() {
            return Err(ExperimentError::AlreadyStarted);
        }
        self.name = name.into();
        Ok(())
    }
}

/// A player group within an experiment, numbered 1..=num_groups
///
/// Groups exist from the moment the experiment is created and are never
/// created independently afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub experiment_id: ExperimentId,
    pub group_number: u32,
    pub created_at: Timestamp,
}

impl Group {
    pub fn new(experiment_id: ExperimentId, group_number: u32, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            experiment_id,
            group_number,
            created_at: now,
        }
    }
}
