//! Single-writer front door.
//!
//! [`Exchange::submit`] takes `&mut self`: the borrow checker guarantees
//! one call at a time, and each call either commits entirely or leaves the
//! state as it was. Every submission, committed or rejected, is appended to
//! the journal.

use genbit_types::{Address, GenbitError, GenesisConfig, Result};

use crate::journal::{GenesisRecord, Journal};
use crate::transition::step;
use crate::{Applied, Call, Command, ExchangeState, QuoteFunding, UnlimitedQuote};

#[derive(Debug)]
pub struct Exchange<F = UnlimitedQuote> {
    state: ExchangeState,
    journal: Journal,
    funding: F,
    /// Hash of `state`, kept so rejected calls need not rehash.
    state_hash: [u8; 32],
}

impl Exchange<UnlimitedQuote> {
    /// `initialize()` with every buyer treated as fully funded in quote currency.
    pub fn initialize(owner: Address, config: &GenesisConfig) -> Result<Self> {
        Self::with_funding(owner, config, UnlimitedQuote)
    }
}

impl<F: QuoteFunding> Exchange<F> {
    /// `initialize()` with an external quote-funds source for buy orders.
    pub fn with_funding(owner: Address, config: &GenesisConfig, funding: F) -> Result<Self> {
        let (state, mint) = ExchangeState::genesis(owner, config)?;
        let state_hash = state.state_hash()?;
        tracing::info!(
            owner = %owner,
            supply = %config.total_supply,
            max_tax_rate = %config.tax.max_rate,
            reserve = %config.liquidity.initial_reserve,
            ?mint,
            "GenBit exchange initialized"
        );
        let journal = Journal::new(GenesisRecord {
            owner,
            config: config.clone(),
            state_hash: hex::encode(state_hash),
        });
        Ok(Self {
            state,
            journal,
            funding,
            state_hash,
        })
    }

    /// Apply one call as `caller`. The journal records it either way.
    pub fn submit(&mut self, caller: Address, command: Command) -> Result<Applied> {
        let call = Call::new(caller, command);
        let op = call.command.name();

        let committed = step(&self.state, &call, &self.funding)
            .and_then(|(next, applied)| Ok((next.state_hash()?, next, applied)));
        let result = match committed {
            Ok((hash, next, applied)) => {
                self.state = next;
                self.state_hash = hash;
                tracing::debug!(
                    seq = self.journal.len(),
                    caller = %caller,
                    op,
                    events = applied.events.len(),
                    "Call committed"
                );
                Ok(applied)
            }
            Err(err) => {
                if matches!(err, GenbitError::SupplyInvariantViolation { .. }) {
                    tracing::error!(caller = %caller, op, error = %err, "Invariant violated, call rolled back");
                } else {
                    tracing::warn!(caller = %caller, op, code = err.code(), error = %err, "Call rejected");
                }
                Err(err)
            }
        };

        self.journal.record(call, &result, self.state_hash)?;
        result
    }

    #[must_use]
    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    #[must_use]
    pub fn state_hash(&self) -> [u8; 32] {
        self.state_hash
    }

    #[must_use]
    pub fn funding(&self) -> &F {
        &self.funding
    }
}
