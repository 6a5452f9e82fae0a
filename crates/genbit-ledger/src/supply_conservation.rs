//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced after every committed call:
//! ```text
//! Σ(available + escrowed) over all accounts, treasury included == genesis supply
//! ```
//!
//! Tokens are minted once and never burned; trades and tax only move them
//! between accounts. A second check ties per-account escrow to the sell
//! orders resting on the book.

use std::collections::BTreeMap;

use genbit_types::{Address, Amount, GenbitError, Result};
use serde::{Deserialize, Serialize};

use crate::BalanceLedger;

/// Remembers the genesis supply and validates the ledger against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyConservation {
    total_supply: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new(total_supply: Amount) -> Self {
        Self { total_supply }
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Verify that the ledger still accounts for exactly the genesis supply.
    ///
    /// # Errors
    /// Returns [`GenbitError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, ledger: &BalanceLedger) -> Result<()> {
        let actual = ledger.circulating()?;
        if actual != self.total_supply {
            return Err(GenbitError::SupplyInvariantViolation {
                reason: format!(
                    "circulating {actual} != total supply {} (escrowed={}, treasury={})",
                    self.total_supply,
                    ledger.total_escrowed()?,
                    ledger.balance_of(Address::TREASURY),
                ),
            });
        }
        Ok(())
    }

    /// Verify that each account's escrow equals what its resting sell orders hold.
    ///
    /// # Errors
    /// Returns [`GenbitError::SupplyInvariantViolation`] on the first mismatch.
    pub fn verify_escrow(
        &self,
        ledger: &BalanceLedger,
        resting: &BTreeMap<Address, Amount>,
    ) -> Result<()> {
        for (account, entry) in ledger.accounts() {
            let expected = resting.get(account).copied().unwrap_or(Amount::ZERO);
            if entry.escrowed != expected {
                return Err(GenbitError::SupplyInvariantViolation {
                    reason: format!(
                        "account {account}: escrowed {} != resting sell orders {expected}",
                        entry.escrowed
                    ),
                });
            }
        }
        for (account, amount) in resting {
            if ledger.escrowed(*account) != *amount {
                return Err(GenbitError::SupplyInvariantViolation {
                    reason: format!("account {account}: resting {amount} has no matching escrow"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    #[test]
    fn genesis_ledger_conserves_supply() {
        let owner = Address::random();
        let ledger = BalanceLedger::genesis(owner, tokens(21_000_000));
        let sc = SupplyConservation::new(tokens(21_000_000));
        sc.verify(&ledger).unwrap();
    }

    #[test]
    fn transfers_and_escrow_conserve_supply() {
        let owner = Address::random();
        let alice = Address::random();
        let mut ledger = BalanceLedger::genesis(owner, tokens(1000));
        ledger.transfer(owner, alice, tokens(300)).unwrap();
        ledger.escrow(alice, tokens(200)).unwrap();
        ledger.consume_escrow(alice, tokens(50)).unwrap();
        ledger.credit(Address::TREASURY, tokens(50)).unwrap();
        SupplyConservation::new(tokens(1000)).verify(&ledger).unwrap();
    }

    #[test]
    fn verify_fails_when_tokens_vanish() {
        let owner = Address::random();
        let mut ledger = BalanceLedger::genesis(owner, tokens(1000));
        ledger.escrow(owner, tokens(10)).unwrap();
        ledger.consume_escrow(owner, tokens(10)).unwrap();
        let err = SupplyConservation::new(tokens(1000)).verify(&ledger).unwrap_err();
        assert!(matches!(err, GenbitError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn verify_fails_when_tokens_appear() {
        let owner = Address::random();
        let mut ledger = BalanceLedger::genesis(owner, tokens(1000));
        ledger.credit(Address::random(), tokens(1)).unwrap();
        assert!(SupplyConservation::new(tokens(1000)).verify(&ledger).is_err());
    }

    #[test]
    fn escrow_matches_resting_orders() {
        let owner = Address::random();
        let mut ledger = BalanceLedger::genesis(owner, tokens(1000));
        ledger.escrow(owner, tokens(400)).unwrap();
        let sc = SupplyConservation::new(tokens(1000));

        let mut resting = BTreeMap::new();
        resting.insert(owner, tokens(400));
        sc.verify_escrow(&ledger, &resting).unwrap();

        resting.insert(owner, tokens(399));
        assert!(sc.verify_escrow(&ledger, &resting).is_err());

        let mut phantom = BTreeMap::new();
        phantom.insert(owner, tokens(400));
        phantom.insert(Address::random(), tokens(1));
        assert!(sc.verify_escrow(&ledger, &phantom).is_err());
    }
}
