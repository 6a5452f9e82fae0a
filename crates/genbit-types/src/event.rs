//! Notifications emitted by committed calls.
//!
//! Events are the observable side of every state change. The exchange hands
//! them back to the caller and records them in the journal; delivering them
//! to an outside event system is the execution layer's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Fill, OrderId, OrderSide, Price};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Available balance moved between accounts. `from == None` is a mint.
    Transfer {
        from: Option<Address>,
        to: Address,
        amount: Amount,
    },
    /// Available balance locked into a sell order.
    Escrowed {
        trader: Address,
        order_id: OrderId,
        amount: Amount,
    },
    /// Escrow handed back to available (cancelled sell order).
    EscrowReleased {
        trader: Address,
        order_id: OrderId,
        amount: Amount,
    },
    OrderPlaced {
        order_id: OrderId,
        trader: Address,
        side: OrderSide,
        amount: Amount,
        price: Price,
    },
    OrderFilled {
        order_id: OrderId,
        side: OrderSide,
    },
    OrderCancelled {
        order_id: OrderId,
        side: OrderSide,
        remaining: Amount,
    },
    Trade(Fill),
    TaxRateAdjusted {
        old_max: Decimal,
        new_max: Decimal,
    },
    ReserveUpdated {
        old: Amount,
        new: Amount,
    },
    LiquidityInjected {
        amount: Amount,
        reserve: Amount,
    },
    VoteCast {
        index: u64,
        voter: Address,
        proposal: String,
        choice: bool,
    },
    EmergencyWithdrawal {
        to: Address,
        amount: Amount,
    },
}

impl Event {
    /// Accounts whose balance this event changes.
    #[must_use]
    pub fn touched_accounts(&self) -> Vec<Address> {
        match self {
            Self::Transfer { from, to, .. } => from.iter().copied().chain([*to]).collect(),
            Self::Escrowed { trader, .. } | Self::EscrowReleased { trader, .. } => vec![*trader],
            Self::Trade(fill) => vec![fill.seller, fill.buyer, Address::TREASURY],
            Self::EmergencyWithdrawal { to, .. } => vec![Address::TREASURY, *to],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_touches_only_recipient() {
        let owner = Address::repeat_byte(1);
        let ev = Event::Transfer {
            from: None,
            to: owner,
            amount: Amount::from_tokens(1),
        };
        assert_eq!(ev.touched_accounts(), vec![owner]);
    }

    #[test]
    fn serde_tagging() {
        let ev = Event::OrderFilled {
            order_id: OrderId(3),
            side: OrderSide::Sell,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"kind\":\"order_filled\""), "got {json}");
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
