//! # genbit-ledger
//!
//! **Balance plane** of GenBit: per-account balances and the total-supply
//! invariant.
//!
//! 1. **BalanceLedger**: available/escrowed accounting per address, the
//!    genesis mint, transfers, and the escrow primitives the order book and
//!    matcher build on
//! 2. **SupplyConservation**: checks that every token minted at genesis is
//!    still accounted for after each committed call
//!
//! Every mutation either applies fully or returns an error with the ledger
//! untouched.

pub mod balance_ledger;
pub mod supply_conservation;

pub use balance_ledger::BalanceLedger;
pub use supply_conservation::SupplyConservation;
