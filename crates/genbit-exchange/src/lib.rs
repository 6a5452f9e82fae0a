//! # genbit-exchange
//!
//! The GenBit state machine. One [`ExchangeState`] value holds everything:
//! balances, the order book, the tax controller, the reserve and the
//! governance ledger. Every operation is a [`Command`] applied by the pure
//! transition [`apply`]; [`Exchange`] wraps it as a single writer with a
//! hash-chained [`Journal`] that [`replay`] can re-execute.
//!
//! ```text
//!  Call{caller, Command} ──▶ apply(state) ──▶ scratch state ──▶ invariants ok? ──▶ commit
//!                                                   │                   │
//!                                                   └──── error ────────┴──▶ state unchanged
//! ```
//!
//! Caller authentication and ordering of concurrent submissions belong to
//! the surrounding execution layer.

pub mod access;
pub mod command;
pub mod exchange;
pub mod funding;
pub mod governance;
pub mod journal;
pub mod liquidity;
pub mod state;
pub mod transition;

pub use access::AccessControl;
pub use command::{Applied, Call, Command, Outcome};
pub use exchange::Exchange;
pub use funding::{QuoteFunding, UnlimitedQuote};
pub use governance::GovernanceLedger;
pub use journal::{EntryStatus, GenesisRecord, Journal, JournalEntry, replay};
pub use liquidity::LiquidityController;
pub use state::ExchangeState;
pub use transition::apply;
