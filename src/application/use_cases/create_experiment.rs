//! Create Experiment use case.
//!
//! Creates the experiment definition together with its groups, numbered
//! 1..=num_groups. Groups are never created independently afterward.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::ports::{ExperimentRepository, IdentityDirectory, StorageError};
use crate::domain::{Clock, Experiment, ExperimentError, Group, UserId};

/// Command to create an experiment
#[derive(Debug, Clone)]
pub struct CreateExperimentCommand {
    pub name: String,
    pub admin_id: UserId,
    pub num_rounds: u32,
    pub num_training_rounds: u32,
    pub num_rounds_for_payment: u32,
    pub num_players: u32,
    pub num_groups: u32,
}

/// Use case for creating experiments
pub struct CreateExperimentUseCase<C, X, I>
where
    C: Clock,
    X: ExperimentRepository,
    I: IdentityDirectory,
{
    clock: Arc<C>,
    experiments: Arc<X>,
    identities: Arc<I>,
}

impl<C, X, I> CreateExperimentUseCase<C, X, I>
where
    C: Clock,
    X: ExperimentRepository,
    I: IdentityDirectory,
{
    pub fn new(clock: Arc<C>, experiments: Arc<X>, identities: Arc<I>) -> Self {
        Self {
            clock,
            experiments,
            identities,
        }
    }

    pub async fn execute(
        &self,
        command: CreateExperimentCommand,
    ) -> Result<Experiment, CreateExperimentError> {
        let admin = self
            .identities
            .get(&command.admin_id)
            .await?
            .ok_or(CreateExperimentError::AdminNotFound(command.admin_id))?;
        if !admin.is_admin() {
            return Err(CreateExperimentError::NotAnAdmin(command.admin_id));
        }

        let now = self.clock.now();
        let experiment = Experiment::new(
            command.name,
            command.admin_id,
            command.num_rounds,
            command.num_training_rounds,
            command.num_rounds_for_payment,
            command.num_players,
            command.num_groups,
            now,
        )?;

        let groups: Vec<Group> = (1..=command.num_groups)
            .map(|n| Group::new(experiment.id, n, now))
            .collect();

        self.experiments.save(experiment.clone()).await?;
        self.experiments.save_groups(groups).await?;

        info!(
            experiment_id = %experiment.id,
            name = %experiment.name,
            groups = experiment.num_groups,
            rounds = experiment.num_rounds,
            "experiment created"
        );

        Ok(experiment)
    }
}

/// Errors that can occur while creating an experiment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateExperimentError {
    #[error("admin not found: {0}")]
    AdminNotFound(UserId),

    #[error("user is not an admin: {0}")]
    NotAnAdmin(UserId),

    #[error(transparent)]
    Invalid(#[from] ExperimentError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
