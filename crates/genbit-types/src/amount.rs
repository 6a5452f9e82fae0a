//! Fixed-point quantities.
//!
//! Every on-ledger quantity is an unsigned integer of smallest units scaled
//! by 10^18. Serialized as a decimal string of units so that values above
//! `u64::MAX` survive any JSON tooling.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{TOKEN_DECIMALS, UNITS_PER_TOKEN};
use crate::{GenbitError, Result};

/// Render `units` (scaled by 10^18) as a normalized decimal number of tokens.
fn units_to_decimal(units: u128) -> Decimal {
    i128::try_from(units)
        .ok()
        .and_then(|n| Decimal::try_from_i128_with_scale(n, TOKEN_DECIMALS).ok())
        .map_or(Decimal::MAX, |d| d.normalize())
}

fn parse_units(s: &str) -> Result<u128> {
    s.parse::<u128>().map_err(|e| GenbitError::Serialization(format!("units {s:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A token (or quote-currency) quantity in smallest units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    #[must_use]
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Whole tokens, scaled by 10^18.
    #[must_use]
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * UNITS_PER_TOKEN)
    }

    #[must_use]
    pub const fn units(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Addition that reports overflow as an error.
    pub fn try_add(self, rhs: Self) -> Result<Self> {
        self.checked_add(rhs).ok_or(GenbitError::ArithmeticOverflow {
            context: "amount addition",
        })
    }

    /// Quantity in whole tokens as a `Decimal` (saturates at `Decimal::MAX`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        units_to_decimal(self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = GenbitError;

    fn try_from(s: String) -> Result<Self> {
        parse_units(&s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// Limit price: quote units per whole token, scaled by 10^18.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Price(u128);

impl Price {
    #[must_use]
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    #[must_use]
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * UNITS_PER_TOKEN)
    }

    #[must_use]
    pub const fn units(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Quote-currency cost of `amount` tokens at this price.
    pub fn quote_cost(self, amount: Amount) -> Result<Amount> {
        amount
            .units()
            .checked_mul(self.0)
            .map(|raw| Amount::from_units(raw / UNITS_PER_TOKEN))
            .ok_or(GenbitError::ArithmeticOverflow {
                context: "quote cost",
            })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", units_to_decimal(self.0))
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.0.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = GenbitError;

    fn try_from(s: String) -> Result<Self> {
        parse_units(&s).map(Self)
    }
}
