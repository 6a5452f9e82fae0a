//! Fill records produced by the matcher.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, OrderId, Price};

/// One executed trade between a buy and a sell order.
///
/// The token leg only: the seller's escrow shrinks by `amount`, the buyer is
/// credited `net`, the treasury `tax`. Quote-currency settlement happens
/// outside the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Position of this fill across the lifetime of the exchange.
    pub sequence: u64,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: Address,
    pub seller: Address,
    /// Gross traded amount.
    pub amount: Amount,
    /// Execution price (the resting sell order's limit).
    pub price: Price,
    /// Effective tax rate in percent when the fill executed.
    pub tax_rate: Decimal,
    pub tax: Amount,
    /// What the buyer received: `amount - tax`.
    pub net: Amount,
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fill[{}] {} <- {} {} @ {} (tax {}% = {})",
            self.sequence, self.buy_order_id, self.sell_order_id, self.amount, self.price, self.tax_rate, self.tax,
        )
    }
}
