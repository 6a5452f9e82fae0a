//! The one logical global state of a GenBit exchange.
//!
//! Every component lives here as a plain value. Nothing is ambient: the
//! transition function receives the state, and the read accessors below are
//! the whole query surface.

use genbit_ledger::{BalanceLedger, SupplyConservation};
use genbit_matchcore::{OrderBook, TaxController};
use genbit_types::{Address, Amount, Event, GenesisConfig, Order, Result, Tally, Vote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccessControl, GovernanceLedger, LiquidityController};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeState {
    pub(crate) access: AccessControl,
    pub(crate) ledger: BalanceLedger,
    pub(crate) supply: SupplyConservation,
    pub(crate) book: OrderBook,
    pub(crate) tax: TaxController,
    pub(crate) liquidity: LiquidityController,
    pub(crate) governance: GovernanceLedger,
    /// Sequence number the next fill will carry.
    pub(crate) next_fill_seq: u64,
}

impl ExchangeState {
    /// `initialize()`: mint the whole supply to `owner`.
    ///
    /// Returns the state and the mint event.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn genesis(owner: Address, config: &GenesisConfig) -> Result<(Self, Event)> {
        config.validate()?;
        let state = Self {
            access: AccessControl::new(owner),
            ledger: BalanceLedger::genesis(owner, config.total_supply),
            supply: SupplyConservation::new(config.total_supply),
            book: OrderBook::new(),
            tax: TaxController::new(config.tax),
            liquidity: LiquidityController::new(config.liquidity),
            governance: GovernanceLedger::new(config.governance),
            next_fill_seq: 0,
        };
        state.check_invariants()?;
        let mint = Event::Transfer {
            from: None,
            to: owner,
            amount: config.total_supply,
        };
        Ok((state, mint))
    }

    /// Supply conservation plus escrow/book agreement.
    pub fn check_invariants(&self) -> Result<()> {
        self.supply.verify(&self.ledger)?;
        self.supply.verify_escrow(&self.ledger, &self.book.resting_escrow())
    }

    /// SHA-256 over the canonical JSON encoding. All maps are ordered, so
    /// equal states hash equally.
    pub fn state_hash(&self) -> Result<[u8; 32]> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(b"genbit:state:v1:");
        hasher.update(&bytes);
        Ok(hasher.finalize().into())
    }

    // =================================================================
    // Reads
    // =================================================================

    #[must_use]
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// `totalSupply()`
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.supply.total_supply()
    }

    /// `balanceOf(addr)`: available plus escrowed.
    #[must_use]
    pub fn balance_of(&self, account: Address) -> Amount {
        self.ledger.balance_of(account)
    }

    #[must_use]
    pub fn available(&self, account: Address) -> Amount {
        self.ledger.available(account)
    }

    #[must_use]
    pub fn escrowed(&self, account: Address) -> Amount {
        self.ledger.escrowed(account)
    }

    /// Tokens held by the exchange itself: collected tax plus direct deposits.
    #[must_use]
    pub fn treasury_balance(&self) -> Amount {
        self.ledger.balance_of(Address::TREASURY)
    }

    /// `reserveUSDT()`
    #[must_use]
    pub fn reserve_usdt(&self) -> Amount {
        self.liquidity.reserve()
    }

    /// `adoptionProgress()`
    #[must_use]
    pub fn adoption_progress(&self) -> Amount {
        self.tax.adoption_progress()
    }

    /// `getTaxRate()`, in percent.
    #[must_use]
    pub fn tax_rate(&self) -> Decimal {
        self.tax.current_rate()
    }

    #[must_use]
    pub fn max_tax_rate(&self) -> Decimal {
        self.tax.max_rate()
    }

    /// `sellOrders(i)`
    #[must_use]
    pub fn sell_order(&self, index: usize) -> Option<&Order> {
        self.book.sell_order(index)
    }

    /// `buyOrders(i)`
    #[must_use]
    pub fn buy_order(&self, index: usize) -> Option<&Order> {
        self.book.buy_order(index)
    }

    /// `getVote(i)`
    #[must_use]
    pub fn vote(&self, index: usize) -> Option<&Vote> {
        self.governance.get_vote(index)
    }

    /// `getVotes()`
    #[must_use]
    pub fn votes(&self) -> &[Vote] {
        self.governance.votes()
    }

    #[must_use]
    pub fn tally(&self, proposal: &str) -> Tally {
        self.governance.tally(proposal)
    }

    #[must_use]
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    #[must_use]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    #[must_use]
    pub fn liquidity(&self) -> &LiquidityController {
        &self.liquidity
    }

    #[must_use]
    pub fn governance(&self) -> &GovernanceLedger {
        &self.governance
    }
}
