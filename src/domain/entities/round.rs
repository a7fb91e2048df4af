//! Round template entity.
//!
//! A round is immutable template data shared by every group of its
//! experiment; the live reserves belong to the per-group pools.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{
    AMOUNT_SCALE, Amount, CurrencyId, ExperimentId, Lifespan, Price, RoundId, Timestamp,
    TransitionError,
};

/// Errors for round configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("currency X and currency Y must be different")]
    SameCurrency,

    #[error("initial reserves must be positive")]
    NonPositiveReserves,

    #[error("duration must be positive")]
    NonPositiveDuration,

    #[error("round has already started")]
    AlreadyStarted,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Updatable subset of a round's configuration
///
/// Applied only while the round has no pools yet; `None` leaves the field
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundPatch {
    pub is_training_round: Option<bool>,
    pub counts_for_payment: Option<bool>,
    pub duration_minutes: Option<u32>,
    pub external_price_x: Option<Price>,
    pub external_price_y: Option<Price>,
    pub initial_reserve_x: Option<Amount>,
    pub initial_reserve_y: Option<Amount>,
    pub endowment_x: Option<Amount>,
    pub endowment_y: Option<Amount>,
}

/// Logical round definition, one per round number per experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub experiment_id: ExperimentId,
    pub round_number: u32,
    pub is_training_round: bool,
    pub counts_for_payment: bool,
    pub duration_minutes: u32,
    pub currency_x_id: CurrencyId,
    pub currency_y_id: CurrencyId,
    /// External reference price of X, revealed per player knowledge
    pub external_price_x: Price,
    /// External reference price of Y, revealed per player knowledge
    pub external_price_y: Price,
    pub initial_reserve_x: Amount,
    pub initial_reserve_y: Amount,
    /// Per-player starting balance in X, credited at round start
    pub endowment_x: Amount,
    /// Per-player starting balance in Y, credited at round start
    pub endowment_y: Amount,
    #[serde(flatten)]
    pub lifespan: Lifespan,
    pub created_at: Timestamp,
}

/// Input for creating a round
#[derive(Debug, Clone)]
pub struct RoundConfig {
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

impl Round {
    pub fn new(
        experiment_id: ExperimentId,
        config: RoundConfig,
        now: Timestamp,
    ) -> Result<Self, RoundError> {
        if config.currency_x_id == config.currency_y_id {
            return Err(RoundError::SameCurrency);
        }
        if config.initial_reserve_x <= Decimal::ZERO || config.initial_reserve_y <= Decimal::ZERO {
            return Err(RoundError::NonPositiveReserves);
        }
        if config.duration_minutes == 0 {
            return Err(RoundError::NonPositiveDuration);
        }

        Ok(Self {
            id: uuid::Uuid::new_v4(),
            experiment_id,
            round_number: config.round_number,
            is_training_round: config.is_training_round,
            counts_for_payment: config.counts_for_payment,
            duration_minutes: config.duration_minutes,
            currency_x_id: config.currency_x_id,
            currency_y_id: config.currency_y_id,
            external_price_x: config.external_price_x,
            external_price_y: config.external_price_y,
            initial_reserve_x: config.initial_reserve_x.round_dp(AMOUNT_SCALE),
            initial_reserve_y: config.initial_reserve_y.round_dp(AMOUNT_SCALE),
            endowment_x: config.endowment_x.round_dp(AMOUNT_SCALE),
            endowment_y: config.endowment_y.round_dp(AMOUNT_SCALE),
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

    /// Apply a configuration patch; the caller guarantees no pools exist yet
    pub fn apply(&mut self, patch: RoundPatch) -> Result<(), RoundError> {
        if self.lifespan.is_started() {
            return Err(RoundError::AlreadyStarted);
        }

        if let Some(v) = patch.is_training_round {
            self.is_training_round = v;
        }
        if let Some(v) = patch.counts_for_payment {
            self.counts_for_payment = v;
        }
        if let Some(v) = patch.duration_minutes {
            if v == 0 {
                return Err(RoundError::NonPositiveDuration);
            }
            self.duration_minutes = v;
        }
        if let Some(v) = patch.external_price_x {
            self.external_price_x = v;
        }
        if let Some(v) = patch.external_price_y {
            self.external_price_y = v;
        }
        if let Some(v) = patch.initial_reserve_x {
            if v <= Decimal::ZERO {
                return Err(RoundError::NonPositiveReserves);
            }
            self.initial_reserve_x = v.round_dp(AMOUNT_SCALE);
        }
        if let Some(v) = patch.initial_reserve_y {
            if v <= Decimal::ZERO {
                return Err(RoundError::NonPositiveReserves);
            }
            self.initial_reserve_y = v.round_dp(AMOUNT_SCALE);
        }
        if let Some(v) = patch.endowment_x {
            self.endowment_x = v.round_dp(AMOUNT_SCALE);
        }
        if let Some(v) = patch.endowment_y {
            self.endowment_y = v.round_dp(AMOUNT_SCALE);
        }
        Ok(())
    }

    /// The external reference price of the given currency, if it is one of
    /// the round's pair
    pub fn external_price_of(&self, currency_id: CurrencyId) -> Option<Price> {
        if currency_id == self.currency_x_id {
            Some(self.external_price_x)
        } else if currency_id == self.currency_y_id {
            Some(self.external_price_y)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn config() -> RoundConfig {
        RoundConfig {
            round_number: 1,
            is_training_round: false,
            counts_for_payment: true,
            duration_minutes: 10,
            currency_x_id: Uuid::new_v4(),
            currency_y_id: Uuid::new_v4(),
            external_price_x: dec!(1.5),
            external_price_y: dec!(0.75),
            initial_reserve_x: dec!(1000),
            initial_reserve_y: dec!(1000),
            endowment_x: dec!(100),
            endowment_y: dec!(100),
        }
    }

    #[test]
    fn test_rejects_same_currency_pair() {
        let mut cfg = config();
        cfg.currency_y_id = cfg.currency_x_id;
        assert_eq!(
            Round::new(Uuid::new_v4(), cfg, Utc::now()).unwrap_err(),
            RoundError::SameCurrency
        );
    }

    #[test]
    fn test_rejects_non_positive_reserves() {
        let mut cfg = config();
        cfg.initial_reserve_x = dec!(0);
        assert_eq!(
            Round::new(Uuid::new_v4(), cfg, Utc::now()).unwrap_err(),
            RoundError::NonPositiveReserves
        );
    }

    #[test]
    fn test_patch_locked_after_start() {
        let mut round = Round::new(Uuid::new_v4(), config(), Utc::now()).unwrap();
        round
            .apply(RoundPatch {
                duration_minutes: Some(20),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(round.duration_minutes, 20);

        round.start(Utc::now()).unwrap();
        assert_eq!(
            round.apply(RoundPatch::default()).unwrap_err(),
            RoundError::AlreadyStarted
        );
    }

    #[test]
    fn test_external_price_lookup() {
        let round = Round::new(Uuid::new_v4(), config(), Utc::now()).unwrap();
        assert_eq!(
            round.external_price_of(round.currency_x_id),
            Some(dec!(1.5))
        );
        assert_eq!(
            round.external_price_of(round.currency_y_id),
            Some(dec!(0.75))
        );
        assert_eq!(round.external_price_of(Uuid::new_v4()), None);
    }
}
