//! Order types for the GenBit order book.
//!
//! Sell orders are escrowed: their remaining amount is held out of the
//! seller's available balance. Buy orders are intents funded in the quote
//! currency outside the token ledger.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, OrderId, Price};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A resting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: Address,
    pub side: OrderSide,
    pub original_amount: Amount,
    pub remaining_amount: Amount,
    pub limit_price: Price,
    /// Position in the global placement sequence (FIFO tiebreak).
    pub sequence: u64,
}

impl Order {
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    #[must_use]
    pub fn filled_amount(&self) -> Amount {
        self.original_amount.saturating_sub(self.remaining_amount)
    }

    /// Whether a buy at `self` may trade against `sell`.
    #[must_use]
    pub fn crosses(&self, sell: &Order) -> bool {
        self.side == OrderSide::Buy && sell.side == OrderSide::Sell && self.limit_price >= sell.limit_price
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(side: OrderSide, amount: Amount, price: Price) -> Self {
        Self {
            id: OrderId(0),
            trader: Address::random(),
            side,
            original_amount: amount,
            remaining_amount: amount,
            limit_price: price,
            sequence: 0,
        }
    }
}
