//! # genbit-types
//!
//! Shared types, errors, and configuration for the **GenBit** token ledger
//! and exchange.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`OrderId`]
//! - **Quantities**: [`Amount`], [`Price`] (fixed-point, scaled by 10^18)
//! - **Balance model**: [`BalanceEntry`]
//! - **Order model**: [`Order`], [`OrderSide`]
//! - **Trade model**: [`Fill`]
//! - **Governance model**: [`Vote`], [`Tally`]
//! - **Notifications**: [`Event`]
//! - **Configuration**: [`GenesisConfig`], [`TaxSchedule`], [`TaxDecay`], [`LiquidityPolicy`], [`GovernancePolicy`]
//! - **Errors**: [`GenbitError`] with `GB_ERR_` prefix codes
//! - **Constants**: genesis supply, thresholds and defaults

pub mod amount;
pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;
pub mod trade;
pub mod vote;

pub use amount::*;
pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;
pub use trade::*;
pub use vote::*;

// Constants are accessed via `genbit_types::constants::FOO`
// (not re-exported to avoid name collisions).
