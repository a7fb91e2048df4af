//! Pool entity: one isolated constant-product market per group per round.
//!
//! Implements the x * y = K invariant. The constant is held fixed across
//! swaps and recomputed only on explicit liquidity changes; recomputing it
//! inside a swap would compound rounding drift across successive trades.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{
    AMOUNT_SCALE, Amount, GroupId, K_SCALE, Lifespan, PoolId, Price, RoundId, Timestamp,
    TransitionError,
};

/// Errors raised by pool arithmetic and activation guards
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("amount must be positive")]
    InvalidAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("pool is not active")]
    PoolInactive,

    #[error("fee percent must satisfy 0 <= fee < 100, got {0}")]
    InvalidFeePercent(Decimal),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Which currency enters the pool in a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Player sends X, receives Y
    XForY,
    /// Player sends Y, receives X
    YForX,
}

/// Result of executing a swap against the pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub fee_amount: Amount,
    pub direction: SwapDirection,
}

/// A live constant-product market instance
///
/// Seeded from its round template when the round is initialized, activated
/// when the round starts, closed when it ends. Never reactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub round_id: RoundId,
    pub group_id: GroupId,
    /// Reserve of currency X, non-negative, 8 fractional digits
    pub reserve_x: Amount,
    /// Reserve of currency Y, non-negative, 8 fractional digits
    pub reserve_y: Amount,
    /// Constant product, 16 fractional digits; fixed for the life of a swap
    pub k_constant: Decimal,
    /// Flat fee charged on the input amount, percent, 0 <= fee < 100
    pub fee_percent: Decimal,
    /// Fee takings in X, held outside the reserves
    pub accumulated_fees_x: Amount,
    /// Fee takings in Y, held outside the reserves
    pub accumulated_fees_y: Amount,
    pub is_active: bool,
    #[serde(flatten)]
    pub lifespan: Lifespan,
    pub swap_count: u64,
    pub created_at: Timestamp,
}

impl Pool {
    /// Seed a new inactive pool from its round template
    pub fn seed(
        round_id: RoundId,
        group_id: GroupId,
        reserve_x: Amount,
        reserve_y: Amount,
        now: Timestamp,
    ) -> Self {
        let reserve_x = reserve_x.round_dp(AMOUNT_SCALE);
        let reserve_y = reserve_y.round_dp(AMOUNT_SCALE);
        Self {
            id: PoolId::new(),
            round_id,
            group_id,
            reserve_x,
            reserve_y,
            k_constant: (reserve_x * reserve_y).round_dp(K_SCALE),
            fee_percent: Decimal::ZERO,
            accumulated_fees_x: Decimal::ZERO,
            accumulated_fees_y: Decimal::ZERO,
            is_active: false,
            lifespan: Lifespan::new(),
            swap_count: 0,
            created_at: now,
        }
    }

    /// Set the flat input fee, percent in [0, 100)
    pub fn with_fee_percent(mut self, fee_percent: Decimal) -> Result<Self, PoolError> {
        if fee_percent < Decimal::ZERO || fee_percent >= Decimal::ONE_HUNDRED {
            return Err(PoolError::InvalidFeePercent(fee_percent));
        }
        self.fee_percent = fee_percent;
        Ok(self)
    }

    /// Both reserves strictly positive
    pub fn has_liquidity(&self) -> bool {
        self.reserve_x > Decimal::ZERO && self.reserve_y > Decimal::ZERO
    }

    /// Price of 1 X in terms of Y (y/x); zero for an empty reserve
    ///
    /// An empty or drained pool has no defined price; the domain convention
    /// is zero rather than an error.
    pub fn price_x_in_y(&self) -> Price {
        if self.reserve_x.is_zero() {
            return Decimal::ZERO;
        }
        self.reserve_y / self.reserve_x
    }

    /// Price of 1 Y in terms of X (x/y); zero for an empty reserve
    pub fn price_y_in_x(&self) -> Price {
        if self.reserve_y.is_zero() {
            return Decimal::ZERO;
        }
        self.reserve_x / self.reserve_y
    }

    /// Swap `dx` of X for Y, holding K fixed
    ///
    /// `x_new = x + dx_net`, `y_new = K / x_new`, output is `y - y_new`.
    pub fn swap_x_for_y(&mut self, dx: Amount) -> Result<SwapOutcome, PoolError> {
        self.swap(dx, SwapDirection::XForY)
    }

    /// Swap `dy` of Y for X, holding K fixed
    pub fn swap_y_for_x(&mut self, dy: Amount) -> Result<SwapOutcome, PoolError> {
        self.swap(dy, SwapDirection::YForX)
    }

    /// Execute a swap in the given direction
    pub fn swap(&mut self, amount_in: Amount, direction: SwapDirection) -> Result<SwapOutcome, PoolError> {
        if !self.is_active {
            return Err(PoolError::PoolInactive);
        }
        if amount_in <= Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }
        if !self.has_liquidity() {
            return Err(PoolError::InsufficientLiquidity);
        }

        let fee_amount =
            (amount_in * self.fee_percent / Decimal::ONE_HUNDRED).round_dp(AMOUNT_SCALE);
        let amount_in_net = amount_in - fee_amount;

        let (reserve_in, reserve_out) = match direction {
            SwapDirection::XForY => (self.reserve_x, self.reserve_y),
            SwapDirection::YForX => (self.reserve_y, self.reserve_x),
        };

        let reserve_in_new = reserve_in + amount_in_net;
        let reserve_out_new = (self.k_constant / reserve_in_new).round_dp(AMOUNT_SCALE);
        let amount_out = reserve_out - reserve_out_new;

        if reserve_out_new <= Decimal::ZERO || amount_out <= Decimal::ZERO {
            return Err(PoolError::InsufficientLiquidity);
        }

        match direction {
            SwapDirection::XForY => {
                self.reserve_x = reserve_in_new;
                self.reserve_y = reserve_out_new;
                self.accumulated_fees_x += fee_amount;
            }
            SwapDirection::YForX => {
                self.reserve_y = reserve_in_new;
                self.reserve_x = reserve_out_new;
                self.accumulated_fees_y += fee_amount;
            }
        }
        self.swap_count += 1;

        Ok(SwapOutcome {
            amount_in,
            amount_out,
            fee_amount,
            direction,
        })
    }

    /// Preview a swap without mutating the pool
    pub fn quote(&self, amount_in: Amount, direction: SwapDirection) -> Result<SwapOutcome, PoolError> {
        let mut scratch = self.clone();
        scratch.swap(amount_in, direction)
    }

    /// Add reserves (management only); recomputes K
    ///
    /// This is one of the two paths that legitimately change the constant.
    pub fn add_liquidity(&mut self, dx: Amount, dy: Amount) -> Result<(), PoolError> {
        if dx < Decimal::ZERO || dy < Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }
        self.reserve_x = (self.reserve_x + dx).round_dp(AMOUNT_SCALE);
        self.reserve_y = (self.reserve_y + dy).round_dp(AMOUNT_SCALE);
        self.recompute_k();
        Ok(())
    }

    /// Remove reserves (management only); both must stay non-negative
    pub fn remove_liquidity(&mut self, dx: Amount, dy: Amount) -> Result<(), PoolError> {
        if dx < Decimal::ZERO || dy < Decimal::ZERO {
            return Err(PoolError::InvalidAmount);
        }
        if self.reserve_x < dx || self.reserve_y < dy {
            return Err(PoolError::InsufficientLiquidity);
        }
        self.reserve_x = (self.reserve_x - dx).round_dp(AMOUNT_SCALE);
        self.reserve_y = (self.reserve_y - dy).round_dp(AMOUNT_SCALE);
        self.recompute_k();
        Ok(())
    }

    fn recompute_k(&mut self) {
        self.k_constant = (self.reserve_x * self.reserve_y).round_dp(K_SCALE);
    }

    /// Inactive -> Active; stamps started_at. Requires seeded liquidity.
    pub fn activate(&mut self, now: Timestamp) -> Result<(), PoolError> {
        if !self.has_liquidity() {
            return Err(PoolError::InsufficientLiquidity);
        }
        self.lifespan.start(now)?;
        self.is_active = true;
        Ok(())
    }

    /// Active -> Closed; stamps ended_at. A closed pool is never reactivated.
    pub fn close(&mut self, now: Timestamp) -> Result<(), PoolError> {
        self.lifespan.end(now)?;
        self.is_active = false;
        Ok(())
    }

    /// Absolute deviation of the current reserve product from K
    pub fn invariant_drift(&self) -> Decimal {
        (self.reserve_x * self.reserve_y - self.k_constant).abs()
    }
}
