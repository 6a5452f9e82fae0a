//! FIFO matching round.
//!
//! ```text
//! match_orders(book, ledger, tax) -> MatchReport
//! ```
//!
//! Walks the buy queue oldest-first. For each buy it scans the sell queue
//! oldest-first, skipping sells priced above the buy's limit, and trades
//! `min(buy.remaining, sell.remaining)` at the sell's limit price until the
//! buy is filled or no compatible sell is left. Exhausted orders leave the
//! book; partial remainders keep their queue position for the next round.
//!
//! Per fill, on the token leg:
//! - the seller's escrow shrinks by the gross amount
//! - the buyer is credited `amount - tax`
//! - the treasury is credited `tax`
//! - adoption progress grows by the gross amount
//!
//! The tax rate is re-read before each fill. A round that finds nothing to
//! trade is a successful no-op.
//!
//! All mutations go to the `&mut` arguments directly. Callers that need the
//! round to be all-or-nothing run it against a scratch copy of their state.

use genbit_ledger::BalanceLedger;
use genbit_types::{Address, Amount, Event, Fill, GenbitError, OrderSide, Result};
use serde::{Deserialize, Serialize};

use crate::{OrderBook, TaxController, determinism::compute_fill_root};

/// Everything one matching round did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Fills in execution order.
    pub fills: Vec<Fill>,
    /// `Trade` and `OrderFilled` events, interleaved as they happened.
    pub events: Vec<Event>,
    /// Aggregate gross traded amount.
    pub volume: Amount,
    /// Aggregate tax credited to the treasury.
    pub tax_collected: Amount,
    #[serde(with = "hex_root")]
    pub fill_root: [u8; 32],
}

impl MatchReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// Run one matching round. `next_fill_seq` numbers fills across rounds and
/// is advanced once per fill.
///
/// # Errors
/// Ledger errors (`InsufficientEscrow`, `ArithmeticOverflow`) indicate the
/// book and ledger disagree. The arguments are left partially mutated.
pub fn match_orders(
    book: &mut OrderBook,
    ledger: &mut BalanceLedger,
    tax: &mut TaxController,
    next_fill_seq: &mut u64,
) -> Result<MatchReport> {
    let mut fills = Vec::new();
    let mut events = Vec::new();
    let mut volume = Amount::ZERO;
    let mut tax_collected = Amount::ZERO;
    let mut filled_ids = Vec::new();

    {
        let (buys, sells) = book.queues_mut();
        let mut bi = 0;
        while bi < buys.orders.len() {
            let buy = &mut buys.orders[bi];
            let mut si = 0;

            while !buy.remaining_amount.is_zero() && si < sells.orders.len() {
                let sell = &mut sells.orders[si];
                if !buy.crosses(sell) {
                    si += 1;
                    continue;
                }

                let amount = buy.remaining_amount.min(sell.remaining_amount);
                let rate = tax.current_rate();
                let levy = TaxController::tax_on(amount, rate)?;
                let net = amount
                    .checked_sub(levy)
                    .ok_or(GenbitError::ArithmeticOverflow { context: "fill net" })?;

                ledger.consume_escrow(sell.trader, amount)?;
                ledger.credit(buy.trader, net)?;
                ledger.credit(Address::TREASURY, levy)?;
                tax.record_volume(amount)?;

                buy.remaining_amount = buy.remaining_amount.saturating_sub(amount);
                sell.remaining_amount = sell.remaining_amount.saturating_sub(amount);
                volume = volume.try_add(amount)?;
                tax_collected = tax_collected.try_add(levy)?;

                let fill = Fill {
                    sequence: *next_fill_seq,
                    buy_order_id: buy.id,
                    sell_order_id: sell.id,
                    buyer: buy.trader,
                    seller: sell.trader,
                    amount,
                    price: sell.limit_price,
                    tax_rate: rate,
                    tax: levy,
                    net,
                };
                *next_fill_seq += 1;
                tracing::debug!(
                    seq = fill.sequence,
                    buy = %fill.buy_order_id,
                    sell = %fill.sell_order_id,
                    amount = %amount,
                    rate = %rate,
                    tax = %levy,
                    "fill"
                );
                events.push(Event::Trade(fill.clone()));
                fills.push(fill);

                if sell.is_filled() {
                    let sell_id = sell.id;
                    sells.orders.remove(si);
                    filled_ids.push(sell_id);
                    events.push(Event::OrderFilled {
                        order_id: sell_id,
                        side: OrderSide::Sell,
                    });
                } else {
                    si += 1;
                }
            }

            if buy.is_filled() {
                let buy_id = buy.id;
                buys.orders.remove(bi);
                filled_ids.push(buy_id);
                events.push(Event::OrderFilled {
                    order_id: buy_id,
                    side: OrderSide::Buy,
                });
            } else {
                bi += 1;
            }
        }
    }

    for id in filled_ids {
        book.forget(id);
    }

    let fill_root = compute_fill_root(&fills);
    tracing::info!(
        fills = fills.len(),
        volume = %volume,
        tax = %tax_collected,
        rate_after = %tax.current_rate(),
        resting_buys = book.buys().len(),
        resting_sells = book.sells().len(),
        "match round complete"
    );

    Ok(MatchReport {
        fills,
        events,
        volume,
        tax_collected,
        fill_root,
    })
}

mod hex_root {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(root: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(root))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| D::Error::custom("fill root must be 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use genbit_types::{OrderId, Price, TaxDecay, TaxSchedule};
    use rust_decimal::Decimal;

    use super::*;
    use crate::verify_fill_root;

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    fn price(n: u64) -> Price {
        Price::from_tokens(n)
    }

    struct Market {
        book: OrderBook,
        ledger: BalanceLedger,
        tax: TaxController,
        seq: u64,
    }

    impl Market {
        fn new(schedule: TaxSchedule) -> Self {
            Self {
                book: OrderBook::new(),
                ledger: BalanceLedger::new(),
                tax: TaxController::new(schedule),
                seq: 0,
            }
        }

        fn sell(&mut self, trader: Address, amount: u64, px: u64) -> OrderId {
            self.ledger.credit(trader, tokens(amount)).unwrap();
            self.ledger.escrow(trader, tokens(amount)).unwrap();
            self.book.place(trader, OrderSide::Sell, tokens(amount), price(px)).unwrap()
        }

        fn buy(&mut self, trader: Address, amount: u64, px: u64) -> OrderId {
            self.book.place(trader, OrderSide::Buy, tokens(amount), price(px)).unwrap()
        }

        fn run(&mut self) -> MatchReport {
            match_orders(&mut self.book, &mut self.ledger, &mut self.tax, &mut self.seq).unwrap()
        }
    }

    fn flat(rate: i64) -> TaxSchedule {
        TaxSchedule {
            max_rate: Decimal::from(rate),
            decay: TaxDecay::Constant,
        }
    }

    #[test]
    fn partial_fill_at_four_percent() {
        let mut m = Market::new(TaxSchedule::default());
        let seller = Address::repeat_byte(1);
        let buyer = Address::repeat_byte(2);
        let sell_id = m.sell(seller, 2000, 1);
        let buy_id = m.buy(buyer, 1000, 1);

        let report = m.run();

        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.volume, tokens(1000));
        assert_eq!(report.tax_collected, tokens(40));
        assert_eq!(m.ledger.balance_of(buyer), tokens(960));
        assert_eq!(m.ledger.balance_of(seller), tokens(1000));
        assert_eq!(m.ledger.escrowed(seller), tokens(1000));
        assert_eq!(m.ledger.balance_of(Address::TREASURY), tokens(40));
        assert_eq!(m.tax.adoption_progress(), tokens(1000));

        // buy gone, sell persists with its remainder
        assert!(!m.book.contains_order(buy_id));
        let rest = m.book.sell_order(0).unwrap();
        assert_eq!(rest.id, sell_id);
        assert_eq!(rest.remaining_amount, tokens(1000));
        assert!(report.events.contains(&Event::OrderFilled {
            order_id: buy_id,
            side: OrderSide::Buy
        }));
    }

    #[test]
    fn oldest_sell_trades_first() {
        let mut m = Market::new(flat(0));
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let first = m.sell(a, 100, 1);
        let second = m.sell(b, 100, 1);
        m.buy(Address::repeat_byte(3), 150, 1);

        let report = m.run();

        assert_eq!(report.fills.len(), 2);
        assert_eq!(report.fills[0].sell_order_id, first);
        assert_eq!(report.fills[0].amount, tokens(100));
        assert_eq!(report.fills[1].sell_order_id, second);
        assert_eq!(report.fills[1].amount, tokens(50));
        assert_eq!(m.book.sell_order(0).unwrap().id, second);
        assert_eq!(m.ledger.escrowed(b), tokens(50));
        assert_eq!(m.ledger.escrowed(a), Amount::ZERO);
    }

    #[test]
    fn oldest_buy_trades_first() {
        let mut m = Market::new(flat(0));
        m.sell(Address::repeat_byte(1), 100, 1);
        let early = m.buy(Address::repeat_byte(2), 100, 1);
        let late = m.buy(Address::repeat_byte(3), 100, 1);

        let report = m.run();

        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].buy_order_id, early);
        assert_eq!(m.book.buy_order(0).unwrap().id, late);
    }

    #[test]
    fn incompatible_sell_is_skipped_not_blocking() {
        let mut m = Market::new(flat(0));
        let pricey = m.sell(Address::repeat_byte(1), 100, 5);
        let cheap = m.sell(Address::repeat_byte(2), 100, 1);
        m.buy(Address::repeat_byte(3), 100, 2);

        let report = m.run();

        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].sell_order_id, cheap);
        assert_eq!(report.fills[0].price, price(1));
        assert_eq!(m.book.sell_order(0).unwrap().id, pricey);
        assert_eq!(m.book.sells().len(), 1);
    }

    #[test]
    fn nothing_to_match_is_noop() {
        let mut m = Market::new(TaxSchedule::default());
        m.sell(Address::repeat_byte(1), 100, 3);
        m.buy(Address::repeat_byte(2), 100, 2);
        let before = (m.book.clone(), m.ledger.clone(), m.tax);

        let report = m.run();

        assert!(report.is_empty());
        assert_eq!(report.volume, Amount::ZERO);
        assert_eq!((m.book, m.ledger, m.tax), before);
        assert_eq!(m.seq, 0);
    }

    #[test]
    fn rate_reread_between_fills() {
        let mut m = Market::new(TaxSchedule {
            max_rate: Decimal::from(4),
            decay: TaxDecay::Hyperbolic {
                half_volume: tokens(1000),
            },
        });
        m.sell(Address::repeat_byte(1), 1000, 1);
        m.sell(Address::repeat_byte(2), 1000, 1);
        m.buy(Address::repeat_byte(3), 2000, 1);

        let report = m.run();

        assert_eq!(report.fills[0].tax_rate, Decimal::from(4));
        assert_eq!(report.fills[1].tax_rate, Decimal::from(2));
        assert_eq!(report.tax_collected, tokens(60));
    }

    #[test]
    fn fill_sequence_continues_across_rounds() {
        let mut m = Market::new(flat(1));
        m.sell(Address::repeat_byte(1), 10, 1);
        m.buy(Address::repeat_byte(2), 5, 1);
        let first = m.run();
        m.buy(Address::repeat_byte(3), 5, 1);
        let second = m.run();

        assert_eq!(first.fills[0].sequence, 0);
        assert_eq!(second.fills[0].sequence, 1);
        assert!(m.book.is_empty());
        assert!(verify_fill_root(&second.fills, &second.fill_root));
    }

    #[test]
    fn report_serializes_root_as_hex() {
        let mut m = Market::new(flat(1));
        m.sell(Address::repeat_byte(1), 10, 1);
        m.buy(Address::repeat_byte(2), 10, 1);
        let report = m.run();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fill_root"], hex::encode(report.fill_root));
        let back: MatchReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
