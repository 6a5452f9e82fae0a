//! Tagged command set: every externally callable operation as data.
//!
//! A [`Call`] is a command plus the caller identity the execution layer
//! authenticated. Calls are what the journal records and what replay
//! re-applies.

use genbit_matchcore::MatchReport;
use genbit_types::{Address, Amount, Event, Order, OrderId, Price, Vote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// `transfer(to, amount)` from the caller's available balance.
    Transfer { to: Address, amount: Amount },
    /// `placeSellOrder(amount, price)`: escrows `amount` of the caller's tokens.
    PlaceSellOrder { amount: Amount, price: Price },
    /// `placeBuyOrder(amount, price)`: records intent, no token escrow.
    PlaceBuyOrder { amount: Amount, price: Price },
    /// Withdraw one of the caller's own resting orders.
    CancelOrder { order_id: OrderId },
    /// Owner only.
    MatchOrders,
    VoteOnProposal { proposal: String, choice: bool },
    /// Owner only. New ceiling in percent.
    AdjustTaxRate { new_max: Decimal },
    /// Owner only.
    SetReserveUsdt { amount: Amount },
    /// Owner only.
    WithdrawReserve { amount: Amount },
    CheckAndInjectLiquidity,
    /// Owner only. Pays out of the treasury account, never out of escrow.
    EmergencyWithdraw { to: Address, amount: Amount },
}

impl Command {
    /// Operation name used in logs and `AccessDenied` errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::PlaceSellOrder { .. } => "placeSellOrder",
            Self::PlaceBuyOrder { .. } => "placeBuyOrder",
            Self::CancelOrder { .. } => "cancelOrder",
            Self::MatchOrders => "matchOrders",
            Self::VoteOnProposal { .. } => "voteOnProposal",
            Self::AdjustTaxRate { .. } => "adjustTaxRate",
            Self::SetReserveUsdt { .. } => "setReserveUSDT",
            Self::WithdrawReserve { .. } => "withdrawReserve",
            Self::CheckAndInjectLiquidity => "checkAndInjectLiquidity",
            Self::EmergencyWithdraw { .. } => "emergencyWithdraw",
        }
    }

    /// Whether only the owner may issue this command.
    #[must_use]
    pub fn owner_only(&self) -> bool {
        matches!(
            self,
            Self::MatchOrders
                | Self::AdjustTaxRate { .. }
                | Self::SetReserveUsdt { .. }
                | Self::WithdrawReserve { .. }
                | Self::EmergencyWithdraw { .. }
        )
    }
}

/// A command together with who issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub caller: Address,
    pub command: Command,
}

impl Call {
    #[must_use]
    pub fn new(caller: Address, command: Command) -> Self {
        Self { caller, command }
    }
}

/// Return value of a committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// `transfer` returned `true`.
    Transferred,
    OrderPlaced { order_id: OrderId },
    OrderCancelled { order: Order },
    Matched { report: MatchReport },
    VoteRecorded { vote: Vote },
    TaxRateAdjusted { old_max: Decimal, new_max: Decimal },
    ReserveUpdated { old: Amount, new: Amount },
    /// `injected` is `None` when the reserve was already at or above the floor.
    LiquidityChecked { injected: Option<Amount>, reserve: Amount },
    EmergencyWithdrawn { to: Address, amount: Amount },
}

/// Outcome plus the events the call emitted, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applied {
    pub outcome: Outcome,
    pub events: Vec<Event>,
}
