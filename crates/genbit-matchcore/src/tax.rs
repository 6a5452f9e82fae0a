//! Adoption-driven transaction tax.
//!
//! The effective rate starts at the owner-set ceiling and decays as
//! cumulative traded volume (adoption progress) grows. The decay curve is
//! a [`TaxDecay`] chosen at genesis.
//!
//! Rates are percentages kept to [`TAX_RATE_PRECISION`] decimal places, so
//! the tax on an amount is exact in parts-per-million:
//! ```text
//! tax = floor(amount × rate × 10^4 / 10^6)
//! ```

use genbit_types::constants::{TAX_RATE_CEILING_PCT, TAX_RATE_PRECISION};
use genbit_types::{Amount, GenbitError, Result, TaxDecay, TaxSchedule};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Parts-per-million in one percent at [`TAX_RATE_PRECISION`] = 4.
const PPM_PER_PERCENT: u32 = 10_000;
const PPM: u128 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxController {
    max_rate: Decimal,
    decay: TaxDecay,
    /// Cumulative gross traded volume. Never decreases.
    adoption_progress: Amount,
}

impl TaxController {
    #[must_use]
    pub fn new(schedule: TaxSchedule) -> Self {
        Self {
            max_rate: schedule.max_rate,
            decay: schedule.decay,
            adoption_progress: Amount::ZERO,
        }
    }

    #[must_use]
    pub fn max_rate(&self) -> Decimal {
        self.max_rate
    }

    #[must_use]
    pub fn decay(&self) -> TaxDecay {
        self.decay
    }

    #[must_use]
    pub fn adoption_progress(&self) -> Amount {
        self.adoption_progress
    }

    /// `getTaxRate()`: effective rate in percent, within `[0, max_rate]`.
    #[must_use]
    pub fn current_rate(&self) -> Decimal {
        let max = self.max_rate;
        let progress = self.adoption_progress.to_decimal();
        let rate = match self.decay {
            TaxDecay::Constant => max,
            TaxDecay::Hyperbolic { half_volume } => {
                let h = half_volume.to_decimal();
                h.checked_add(progress)
                    .and_then(|denom| max.checked_mul(h)?.checked_div(denom))
                    .unwrap_or(Decimal::ZERO)
            }
            TaxDecay::Linear { zero_volume } => {
                let z = zero_volume.to_decimal();
                if progress >= z {
                    Decimal::ZERO
                } else {
                    progress
                        .checked_div(z)
                        .and_then(|used| max.checked_mul(Decimal::ONE - used))
                        .unwrap_or(Decimal::ZERO)
                }
            }
        };
        rate.round_dp(TAX_RATE_PRECISION).clamp(Decimal::ZERO, max)
    }

    /// `adjustTaxRate(newMax)`. Returns the previous ceiling.
    ///
    /// # Errors
    /// `InvalidParameter` if `new_max` is negative or above the global ceiling.
    pub fn adjust_max_rate(&mut self, new_max: Decimal) -> Result<Decimal> {
        let ceiling = Decimal::from(TAX_RATE_CEILING_PCT);
        if new_max.is_sign_negative() && !new_max.is_zero() {
            return Err(GenbitError::invalid(format!("tax rate {new_max} is negative")));
        }
        if new_max > ceiling {
            return Err(GenbitError::invalid(format!("tax rate {new_max} exceeds ceiling {ceiling}")));
        }
        if new_max.round_dp(TAX_RATE_PRECISION) != new_max {
            return Err(GenbitError::invalid(format!(
                "tax rate {new_max} has more than {TAX_RATE_PRECISION} decimal places"
            )));
        }
        let old = self.max_rate;
        self.max_rate = new_max;
        Ok(old)
    }

    /// Add traded gross volume to adoption progress.
    pub fn record_volume(&mut self, amount: Amount) -> Result<()> {
        self.adoption_progress = self.adoption_progress.try_add(amount)?;
        Ok(())
    }

    /// Tax owed on `amount` at `rate` percent, rounded down to the unit.
    pub fn tax_on(amount: Amount, rate: Decimal) -> Result<Amount> {
        let ppm = (rate * Decimal::from(PPM_PER_PERCENT))
            .trunc()
            .to_u128()
            .ok_or_else(|| GenbitError::invalid(format!("tax rate {rate} not representable")))?;
        amount
            .units()
            .checked_mul(ppm)
            .map(|raw| Amount::from_units(raw / PPM))
            .ok_or(GenbitError::ArithmeticOverflow { context: "tax" })
    }
}
