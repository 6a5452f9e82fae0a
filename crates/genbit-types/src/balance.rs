//! Balance tracking types for the GenBit escrow model.
//!
//! Every account has an `available` balance (transferable, usable for new
//! sell orders) and an `escrowed` balance (locked by resting sell orders).

use serde::{Deserialize, Serialize};

use crate::Amount;

/// Balance of a single account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    /// Spendable by the owner of the account.
    pub available: Amount,
    /// Held by the order book for resting sell orders.
    pub escrowed: Amount,
}

impl BalanceEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total balance (available + escrowed). This is what `balanceOf` reports.
    #[must_use]
    pub fn total(&self) -> Amount {
        Amount::from_units(self.available.units().saturating_add(self.escrowed.units()))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.escrowed.is_zero()
    }
}
