//! Create Round use case.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::ports::{
    CurrencyDirectory, ExperimentRepository, RoundRepository, StorageError,
};
use crate::domain::{
    Amount, Clock, CurrencyId, ExperimentId, Price, Round, RoundConfig, RoundError,
};

/// Command to create a round template
#[derive(Debug, Clone)]
pub struct CreateRoundCommand {
    pub experiment_id: ExperimentId,
    pub round_number: u32,
    pub is_training_round: bool,
    pub counts_for_payment: bool,
    pub duration_minutes: u32,
    pub currency_x_id: CurrencyId,
    pub currency_y_id: CurrencyId,
    pub external_price_x: Price,
    pub external_price_y: Price,
    pub initial_reserve_x: Amount,
    pub initial_reserve_y: Amount,
    pub endowment_x: Amount,
    pub endowment_y: Amount,
}

/// Use case for creating round templates
pub struct CreateRoundUseCase<C, X, R, D>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    D: CurrencyDirectory,
{
    clock: Arc<C>,
    experiments: Arc<X>,
    rounds: Arc<R>,
    currencies: Arc<D>,
}

impl<C, X, R, D> CreateRoundUseCase<C, X, R, D>
where
    C: Clock,
    X: ExperimentRepository,
    R: RoundRepository,
    D: CurrencyDirectory,
{
    pub fn new(clock: Arc<C>, experiments: Arc<X>, rounds: Arc<R>, currencies: Arc<D>) -> Self {
        Self {
            clock,
            experiments,
            rounds,
            currencies,
        }
    }

    pub async fn execute(&self, command: CreateRoundCommand) -> Result<Round, CreateRoundError> {
        self.experiments
            .get(&command.experiment_id)
            .await?
            .ok_or(CreateRoundError::ExperimentNotFound(command.experiment_id))?;

        for currency_id in [command.currency_x_id, command.currency_y_id] {
            if !self.currencies.exists(&currency_id).await? {
                return Err(CreateRoundError::CurrencyNotFound(currency_id));
            }
        }

        let siblings = self.rounds.by_experiment(&command.experiment_id).await?;
        if siblings
            .iter()
            .any(|r| r.round_number == command.round_number)
        {
            return Err(CreateRoundError::DuplicateRoundNumber(command.round_number));
        }

        let round = Round::new(
            command.experiment_id,
            RoundConfig {
                round_number: command.round_number,
                is_training_round: command.is_training_round,
                counts_for_payment: command.counts_for_payment,
                duration_minutes: command.duration_minutes,
                currency_x_id: command.currency_x_id,
                currency_y_id: command.currency_y_id,
                external_price_x: command.external_price_x,
                external_price_y: command.external_price_y,
                initial_reserve_x: command.initial_reserve_x,
                initial_reserve_y: command.initial_reserve_y,
                endowment_x: command.endowment_x,
                endowment_y: command.endowment_y,
            },
            self.clock.now(),
        )?;

        self.rounds.save(round.clone()).await?;

        info!(
            round_id = %round.id,
            experiment_id = %round.experiment_id,
            round_number = round.round_number,
            training = round.is_training_round,
            "round created"
        );

        Ok(round)
    }
}

/// Errors that can occur while creating a round
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateRoundError {
    #[error("experiment not found: {0}")]
    ExperimentNotFound(ExperimentId),

    #[error("currency not found: {0}")]
    CurrencyNotFound(CurrencyId),

    #[error("round number {0} already exists for this experiment")]
    DuplicateRoundNumber(u32),

    #[error(transparent)]
    Invalid(#[from] RoundError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
