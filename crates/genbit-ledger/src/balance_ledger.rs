//! Per-account balances with available/escrowed accounting.
//!
//! All mutations are atomic: either the full operation succeeds or the
//! balance is unchanged. Checks run before any write.

use std::collections::BTreeMap;

use genbit_types::{Address, Amount, BalanceEntry, GenbitError, Result};
use serde::{Deserialize, Serialize};

/// The source of truth for token balances.
///
/// Keyed by `BTreeMap` so that iteration (and therefore serialization and
/// state hashing) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLedger {
    balances: BTreeMap<Address, BalanceEntry>,
}

impl BalanceLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Genesis mint: a fresh ledger holding `supply` for `owner`.
    #[must_use]
    pub fn genesis(owner: Address, supply: Amount) -> Self {
        let mut ledger = Self::new();
        ledger.balances.insert(
            owner,
            BalanceEntry {
                available: supply,
                escrowed: Amount::ZERO,
            },
        );
        tracing::debug!(owner = %owner, supply = %supply, "Genesis mint");
        ledger
    }

    /// Move `amount` of available balance from `from` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` has less than `amount` available.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        // Cannot overflow: credited value was just debited from the same supply.
        self.credit(to, amount)
    }

    /// Available → escrowed. Used when a sell order is placed.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn escrow(&mut self, account: Address, amount: Amount) -> Result<()> {
        let entry = self.balances.get_mut(&account).ok_or(GenbitError::InsufficientBalance {
            needed: amount,
            available: Amount::ZERO,
        })?;

        let available = entry
            .available
            .checked_sub(amount)
            .ok_or(GenbitError::InsufficientBalance {
                needed: amount,
                available: entry.available,
            })?;
        let escrowed = entry.escrowed.try_add(amount)?;

        entry.available = available;
        entry.escrowed = escrowed;
        Ok(())
    }

    /// Escrowed → available. Used when a sell order is cancelled.
    ///
    /// # Errors
    /// Returns `InsufficientEscrow` if escrowed < amount.
    pub fn release_escrow(&mut self, account: Address, amount: Amount) -> Result<()> {
        let entry = self.escrow_entry(account, amount)?;
        entry.escrowed = entry.escrowed.saturating_sub(amount);
        entry.available = entry.available.try_add(amount)?;
        Ok(())
    }

    /// Remove escrowed funds without returning them to available. The matcher
    /// credits the same amount elsewhere in the same call.
    ///
    /// # Errors
    /// Returns `InsufficientEscrow` if escrowed < amount.
    pub fn consume_escrow(&mut self, account: Address, amount: Amount) -> Result<()> {
        let entry = self.escrow_entry(account, amount)?;
        entry.escrowed = entry.escrowed.saturating_sub(amount);
        Ok(())
    }

    /// Credit available balance. Creates the account on first reference.
    pub fn credit(&mut self, account: Address, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let entry = self.balances.entry(account).or_default();
        entry.available = entry.available.try_add(amount)?;
        Ok(())
    }

    /// Debit available balance.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn debit(&mut self, account: Address, amount: Amount) -> Result<()> {
        let available = self.available(account);
        let remaining = available
            .checked_sub(amount)
            .ok_or(GenbitError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        if let Some(entry) = self.balances.get_mut(&account) {
            entry.available = remaining;
        }
        Ok(())
    }

    /// Full entry for an account (zero if never referenced).
    #[must_use]
    pub fn entry(&self, account: Address) -> BalanceEntry {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// `balanceOf`: available + escrowed.
    #[must_use]
    pub fn balance_of(&self, account: Address) -> Amount {
        self.entry(account).total()
    }

    #[must_use]
    pub fn available(&self, account: Address) -> Amount {
        self.entry(account).available
    }

    #[must_use]
    pub fn escrowed(&self, account: Address) -> Amount {
        self.entry(account).escrowed
    }

    /// Sum of every account's total balance.
    pub fn circulating(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, entry| acc.try_add(entry.total()))
    }

    /// Sum of every account's escrowed balance.
    pub fn total_escrowed(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, entry| acc.try_add(entry.escrowed))
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &BalanceEntry)> {
        self.balances.iter().filter(|(_, entry)| !entry.is_zero())
    }

    fn escrow_entry(&mut self, account: Address, amount: Amount) -> Result<&mut BalanceEntry> {
        let escrowed = self.escrowed(account);
        if escrowed < amount {
            return Err(GenbitError::InsufficientEscrow {
                account,
                needed: amount,
                escrowed,
            });
        }
        Ok(self.balances.entry(account).or_default())
    }
}
