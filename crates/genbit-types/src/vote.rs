//! Governance vote records.

use serde::{Deserialize, Serialize};

use crate::Address;

/// A single, immutable vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Insertion index in the governance ledger.
    pub index: u64,
    pub voter: Address,
    pub proposal: String,
    pub choice: bool,
}

/// Yes/no counts for one proposal text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    #[must_use]
    pub fn passes(&self) -> bool {
        self.yes > self.no
    }
}
