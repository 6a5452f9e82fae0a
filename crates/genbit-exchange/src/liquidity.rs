//! Reserve liquidity controller.
//!
//! The reserve is an abstract quote-currency (USDT) balance backing the
//! exchange's liquidity commitments. It lives outside the token ledger:
//! moving it never touches token supply.
//!
//! ```text
//! reserve < floor  ──check_and_inject──▶  reserve = target  (> floor)
//! reserve ≥ floor  ──check_and_inject──▶  unchanged
//! ```

use genbit_types::{Amount, GenbitError, LiquidityPolicy, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityController {
    reserve: Amount,
    policy: LiquidityPolicy,
    /// Sum of every injection so far.
    injected_total: Amount,
}

impl LiquidityController {
    #[must_use]
    pub fn new(policy: LiquidityPolicy) -> Self {
        Self {
            reserve: policy.initial_reserve,
            policy,
            injected_total: Amount::ZERO,
        }
    }

    /// `reserveUSDT()`
    #[must_use]
    pub fn reserve(&self) -> Amount {
        self.reserve
    }

    #[must_use]
    pub fn policy(&self) -> LiquidityPolicy {
        self.policy
    }

    #[must_use]
    pub fn injected_total(&self) -> Amount {
        self.injected_total
    }

    #[must_use]
    pub fn below_floor(&self) -> bool {
        self.reserve < self.policy.floor
    }

    /// Top the reserve up to the target if it sits below the floor.
    /// Returns the injected amount, or `None` when no injection was needed.
    pub fn check_and_inject(&mut self) -> Result<Option<Amount>> {
        if !self.below_floor() {
            return Ok(None);
        }
        let injection = self
            .policy
            .target
            .checked_sub(self.reserve)
            .ok_or(GenbitError::ArithmeticOverflow { context: "liquidity injection" })?;
        self.injected_total = self.injected_total.try_add(injection)?;
        self.reserve = self.policy.target;
        tracing::info!(
            injected = %injection,
            reserve = %self.reserve,
            floor = %self.policy.floor,
            "Liquidity injected"
        );
        Ok(Some(injection))
    }

    /// `setReserveUSDT(amount)`. Returns the previous reserve.
    pub fn set_reserve(&mut self, amount: Amount) -> Amount {
        std::mem::replace(&mut self.reserve, amount)
    }

    /// `withdrawReserve(amount)`. Returns the previous reserve.
    ///
    /// # Errors
    /// `InvalidParameter` for a zero amount, `InsufficientBalance` if the
    /// reserve holds less than `amount`.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount> {
        if amount.is_zero() {
            return Err(GenbitError::invalid("reserve withdrawal must be positive"));
        }
        let remaining = self
            .reserve
            .checked_sub(amount)
            .ok_or(GenbitError::InsufficientBalance {
                needed: amount,
                available: self.reserve,
            })?;
        Ok(std::mem::replace(&mut self.reserve, remaining))
    }
}
