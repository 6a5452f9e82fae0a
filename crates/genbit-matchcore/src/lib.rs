//! # genbit-matchcore
//!
//! **Exchange core of GenBit**: the FIFO order book, the adoption-driven
//! tax controller, and the matching algorithm that settles the token leg of
//! each trade against the balance ledger.
//!
//! - **Strict FIFO**: each side is a single arrival-ordered queue; the oldest
//!   compatible order always trades first
//! - **Tax at execution time**: the rate is re-read before every fill, so
//!   volume traded earlier in a round lowers the rate for later fills
//! - **Deterministic output**: same book and ledger in, same fills and
//!   `fill_root` out

pub mod determinism;
pub mod matcher;
pub mod order_queue;
pub mod orderbook;
pub mod tax;

pub use determinism::{compute_fill_root, verify_fill_root};
pub use matcher::{MatchReport, match_orders};
pub use order_queue::OrderQueue;
pub use orderbook::OrderBook;
pub use tax::TaxController;
