//! One side of the book.
//!
//! Orders are stored in arrival order (FIFO) using a [`VecDeque`]: the
//! front has the highest time priority.

use std::collections::VecDeque;

use genbit_types::{Amount, Order, OrderId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueue {
    /// Orders in time-priority order (front = oldest = highest priority).
    pub(crate) orders: VecDeque<Order>,
}

impl OrderQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order to the back of the queue (lowest time priority).
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Peek at the front order without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Order at queue position `index` (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    /// Total remaining amount across the queue.
    #[must_use]
    pub fn total_remaining(&self) -> Amount {
        Amount::from_units(self.orders.iter().map(|o| o.remaining_amount.units()).sum())
    }

    /// Remove a specific order by ID. Returns the removed order, or `None`.
    pub fn remove_order(&mut self, order_id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == order_id)?;
        self.orders.remove(pos)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
