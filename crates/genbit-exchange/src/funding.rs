//! Quote-currency funding check for buy orders.
//!
//! Buyers pay in a quote currency the token ledger does not hold. Whether a
//! buyer can cover `amount × price` is answered by the execution layer
//! through this trait.

use genbit_types::{Address, Amount};

pub trait QuoteFunding {
    /// Quote funds `trader` can commit to a new buy order.
    fn available_quote(&self, trader: Address) -> Amount;
}

/// Every trader is treated as fully funded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedQuote;

impl QuoteFunding for UnlimitedQuote {
    fn available_quote(&self, _trader: Address) -> Amount {
        Amount::MAX
    }
}

impl<F: Fn(Address) -> Amount> QuoteFunding for F {
    fn available_quote(&self, trader: Address) -> Amount {
        self(trader)
    }
}
