//! The GenBit order book.
//!
//! Two strict FIFO queues, one per side. There are no price levels: price
//! only decides *whether* a buy and a sell may trade, never who goes first.
//!
//! An auxiliary `BTreeMap<OrderId, OrderSide>` enables cancellation without
//! scanning both queues.

use std::collections::BTreeMap;

use genbit_types::{Address, Amount, GenbitError, Order, OrderId, OrderSide, Price, Result};
use serde::{Deserialize, Serialize};

use crate::order_queue::OrderQueue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Buy intents, oldest first.
    buys: OrderQueue,
    /// Escrowed sell orders, oldest first.
    sells: OrderQueue,
    /// Fast lookup: `OrderId -> side` for cancel.
    index: BTreeMap<OrderId, OrderSide>,
    next_id: OrderId,
    next_sequence: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buys: OrderQueue::new(),
            sells: OrderQueue::new(),
            index: BTreeMap::new(),
            next_id: OrderId(1),
            next_sequence: 0,
        }
    }

    // =================================================================
    // Placement
    // =================================================================

    /// Append a new order to the tail of its side's queue.
    ///
    /// Escrow for sell orders is the caller's job; the book only records.
    ///
    /// # Errors
    /// `InvalidParameter` if `amount` or `price` is zero.
    pub fn place(&mut self, trader: Address, side: OrderSide, amount: Amount, price: Price) -> Result<OrderId> {
        if amount.is_zero() {
            return Err(GenbitError::invalid(format!("{side} order amount must be positive")));
        }
        if price.is_zero() {
            return Err(GenbitError::invalid(format!("{side} order price must be positive")));
        }

        let id = self.next_id;
        let order = Order {
            id,
            trader,
            side,
            original_amount: amount,
            remaining_amount: amount,
            limit_price: price,
            sequence: self.next_sequence,
        };
        self.next_id = id.next();
        self.next_sequence += 1;

        self.index.insert(id, side);
        self.side_mut(side).push_back(order);
        Ok(id)
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Remove an order by ID. Returns the removed order with its remaining amount.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order> {
        let side = self
            .index
            .remove(&order_id)
            .ok_or(GenbitError::OrderNotFound(order_id))?;
        self.side_mut(side)
            .remove_order(order_id)
            .ok_or(GenbitError::OrderNotFound(order_id))
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        let side = self.index.get(&order_id)?;
        self.side(*side).iter().find(|o| o.id == order_id)
    }

    /// `buyOrders(i)`: the i-th oldest resting buy.
    #[must_use]
    pub fn buy_order(&self, index: usize) -> Option<&Order> {
        self.buys.get(index)
    }

    /// `sellOrders(i)`: the i-th oldest resting sell.
    #[must_use]
    pub fn sell_order(&self, index: usize) -> Option<&Order> {
        self.sells.get(index)
    }

    #[must_use]
    pub fn buys(&self) -> &OrderQueue {
        &self.buys
    }

    #[must_use]
    pub fn sells(&self) -> &OrderQueue {
        &self.sells
    }

    #[must_use]
    pub fn side(&self, side: OrderSide) -> &OrderQueue {
        match side {
            OrderSide::Buy => &self.buys,
            OrderSide::Sell => &self.sells,
        }
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Remaining sell amount per trader: what the ledger must hold in escrow.
    #[must_use]
    pub fn resting_escrow(&self) -> BTreeMap<Address, Amount> {
        let mut held: BTreeMap<Address, Amount> = BTreeMap::new();
        for order in self.sells.iter() {
            let slot = held.entry(order.trader).or_default();
            *slot = Amount::from_units(slot.units() + order.remaining_amount.units());
        }
        held
    }

    // =================================================================
    // Matcher access
    // =================================================================

    pub(crate) fn queues_mut(&mut self) -> (&mut OrderQueue, &mut OrderQueue) {
        (&mut self.buys, &mut self.sells)
    }

    /// Drop a filled order from the index. The matcher removes it from its queue.
    pub(crate) fn forget(&mut self, order_id: OrderId) {
        self.index.remove(&order_id);
    }

    fn side_mut(&mut self, side: OrderSide) -> &mut OrderQueue {
        match side {
            OrderSide::Buy => &mut self.buys,
            OrderSide::Sell => &mut self.sells,
        }
    }
}
