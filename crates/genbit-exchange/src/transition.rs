//! The deterministic state transition.
//!
//! ```text
//! apply(state, call) -> (state', Result<Applied>)
//! ```
//!
//! The call runs against a scratch copy. Only when the command succeeds
//! *and* the supply and escrow invariants still hold does the copy become
//! the new state. Any failure hands back the untouched input, so a
//! rejected call is never partially visible.

use genbit_matchcore::match_orders;
use genbit_types::{Address, Event, GenbitError, OrderSide, Result};

use crate::{Applied, Call, Command, ExchangeState, Outcome, QuoteFunding};

/// Apply one call. On error the returned state equals `state`.
#[must_use]
pub fn apply(state: &ExchangeState, call: &Call, funding: &dyn QuoteFunding) -> (ExchangeState, Result<Applied>) {
    match step(state, call, funding) {
        Ok((next, applied)) => (next, Ok(applied)),
        Err(err) => (state.clone(), Err(err)),
    }
}

/// Like [`apply`] but without handing back a copy on failure.
pub(crate) fn step(
    state: &ExchangeState,
    call: &Call,
    funding: &dyn QuoteFunding,
) -> Result<(ExchangeState, Applied)> {
    let mut next = state.clone();
    let applied = execute(&mut next, call, funding)?;
    next.check_invariants()?;
    Ok((next, applied))
}

fn execute(state: &mut ExchangeState, call: &Call, funding: &dyn QuoteFunding) -> Result<Applied> {
    let caller = call.caller;
    if call.command.owner_only() {
        state.access.ensure_owner(caller, call.command.name())?;
    }

    let mut events = Vec::new();
    let outcome = match &call.command {
        Command::Transfer { to, amount } => {
            state.ledger.transfer(caller, *to, *amount)?;
            events.push(Event::Transfer {
                from: Some(caller),
                to: *to,
                amount: *amount,
            });
            Outcome::Transferred
        }

        Command::PlaceSellOrder { amount, price } => {
            let order_id = state.book.place(caller, OrderSide::Sell, *amount, *price)?;
            state.ledger.escrow(caller, *amount)?;
            events.push(Event::OrderPlaced {
                order_id,
                trader: caller,
                side: OrderSide::Sell,
                amount: *amount,
                price: *price,
            });
            events.push(Event::Escrowed {
                trader: caller,
                order_id,
                amount: *amount,
            });
            Outcome::OrderPlaced { order_id }
        }

        Command::PlaceBuyOrder { amount, price } => {
            let order_id = state.book.place(caller, OrderSide::Buy, *amount, *price)?;
            let cost = price.quote_cost(*amount)?;
            let available = funding.available_quote(caller);
            if available < cost {
                return Err(GenbitError::InsufficientBalance { needed: cost, available });
            }
            events.push(Event::OrderPlaced {
                order_id,
                trader: caller,
                side: OrderSide::Buy,
                amount: *amount,
                price: *price,
            });
            Outcome::OrderPlaced { order_id }
        }

        Command::CancelOrder { order_id } => {
            let trader = state
                .book
                .get(*order_id)
                .map(|o| o.trader)
                .ok_or(GenbitError::OrderNotFound(*order_id))?;
            if trader != caller {
                return Err(GenbitError::AccessDenied {
                    caller,
                    operation: call.command.name(),
                });
            }
            let order = state.book.cancel(*order_id)?;
            events.push(Event::OrderCancelled {
                order_id: order.id,
                side: order.side,
                remaining: order.remaining_amount,
            });
            if order.side == OrderSide::Sell {
                state.ledger.release_escrow(caller, order.remaining_amount)?;
                events.push(Event::EscrowReleased {
                    trader: caller,
                    order_id: order.id,
                    amount: order.remaining_amount,
                });
            }
            Outcome::OrderCancelled { order }
        }

        Command::MatchOrders => {
            let report = match_orders(
                &mut state.book,
                &mut state.ledger,
                &mut state.tax,
                &mut state.next_fill_seq,
            )?;
            events.extend(report.events.iter().cloned());
            Outcome::Matched { report }
        }

        Command::VoteOnProposal { proposal, choice } => {
            let stake = state.ledger.balance_of(caller);
            let vote = state.governance.vote(caller, proposal, *choice, stake)?.clone();
            events.push(Event::VoteCast {
                index: vote.index,
                voter: vote.voter,
                proposal: vote.proposal.clone(),
                choice: vote.choice,
            });
            Outcome::VoteRecorded { vote }
        }

        Command::AdjustTaxRate { new_max } => {
            let old_max = state.tax.adjust_max_rate(*new_max)?;
            events.push(Event::TaxRateAdjusted {
                old_max,
                new_max: *new_max,
            });
            Outcome::TaxRateAdjusted {
                old_max,
                new_max: *new_max,
            }
        }

        Command::SetReserveUsdt { amount } => {
            let old = state.liquidity.set_reserve(*amount);
            events.push(Event::ReserveUpdated { old, new: *amount });
            Outcome::ReserveUpdated { old, new: *amount }
        }

        Command::WithdrawReserve { amount } => {
            let old = state.liquidity.withdraw(*amount)?;
            let new = state.liquidity.reserve();
            events.push(Event::ReserveUpdated { old, new });
            Outcome::ReserveUpdated { old, new }
        }

        Command::CheckAndInjectLiquidity => {
            let injected = state.liquidity.check_and_inject()?;
            let reserve = state.liquidity.reserve();
            if let Some(amount) = injected {
                events.push(Event::LiquidityInjected { amount, reserve });
            }
            Outcome::LiquidityChecked { injected, reserve }
        }

        Command::EmergencyWithdraw { to, amount } => {
            if amount.is_zero() {
                return Err(GenbitError::invalid("emergency withdrawal must be positive"));
            }
            state.ledger.transfer(Address::TREASURY, *to, *amount)?;
            tracing::warn!(to = %to, amount = %amount, "Emergency withdrawal from treasury");
            events.push(Event::EmergencyWithdrawal { to: *to, amount: *amount });
            Outcome::EmergencyWithdrawn { to: *to, amount: *amount }
        }
    };

    Ok(Applied { outcome, events })
}

#[cfg(test)]
mod tests {
    use genbit_types::{Amount, GenesisConfig, Price};

    use super::*;
    use crate::UnlimitedQuote;

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    fn genesis() -> (ExchangeState, Address) {
        let owner = Address::repeat_byte(0xaa);
        let (state, _) = ExchangeState::genesis(owner, &GenesisConfig::default()).unwrap();
        (state, owner)
    }

    fn run(state: &ExchangeState, caller: Address, command: Command) -> (ExchangeState, Result<Applied>) {
        apply(state, &Call::new(caller, command), &UnlimitedQuote)
    }

    #[test]
    fn rejected_call_returns_input_state() {
        let (state, _) = genesis();
        let stranger = Address::repeat_byte(1);
        let (next, result) = run(
            &state,
            stranger,
            Command::Transfer {
                to: Address::repeat_byte(2),
                amount: tokens(1),
            },
        );
        assert!(matches!(result, Err(GenbitError::InsufficientBalance { .. })));
        assert_eq!(next, state);
    }

    #[test]
    fn sell_order_escrows_and_cancel_releases() {
        let (state, owner) = genesis();
        let (state, result) = run(
            &state,
            owner,
            Command::PlaceSellOrder {
                amount: tokens(500),
                price: Price::from_tokens(1),
            },
        );
        let Outcome::OrderPlaced { order_id } = result.unwrap().outcome else {
            panic!("expected OrderPlaced");
        };
        assert_eq!(state.escrowed(owner), tokens(500));
        assert_eq!(state.balance_of(owner), tokens(21_000_000));

        let (state, result) = run(&state, owner, Command::CancelOrder { order_id });
        let applied = result.unwrap();
        assert!(applied.events.iter().any(|e| matches!(e, Event::EscrowReleased { .. })));
        assert_eq!(state.escrowed(owner), Amount::ZERO);
        assert!(state.sell_order(0).is_none());
    }

    #[test]
    fn cancel_someone_elses_order_denied() {
        let (state, owner) = genesis();
        let (state, result) = run(
            &state,
            owner,
            Command::PlaceBuyOrder {
                amount: tokens(1),
                price: Price::from_tokens(1),
            },
        );
        let Outcome::OrderPlaced { order_id } = result.unwrap().outcome else {
            panic!("expected OrderPlaced");
        };
        let (after, result) = run(&state, Address::repeat_byte(3), Command::CancelOrder { order_id });
        assert!(matches!(result, Err(GenbitError::AccessDenied { .. })));
        assert_eq!(after, state);
    }

    #[test]
    fn buy_order_needs_quote_funds() {
        let (state, owner) = genesis();
        let funding = |_: Address| tokens(50);
        let call = Call::new(
            owner,
            Command::PlaceBuyOrder {
                amount: tokens(100),
                price: Price::from_tokens(1),
            },
        );
        let (after, result) = apply(&state, &call, &funding);
        match result {
            Err(GenbitError::InsufficientBalance { needed, available }) => {
                assert_eq!(needed, tokens(100));
                assert_eq!(available, tokens(50));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(after, state);
    }

    #[test]
    fn privileged_commands_check_owner_first() {
        let (state, _) = genesis();
        let stranger = Address::repeat_byte(5);
        for command in [
            Command::MatchOrders,
            Command::AdjustTaxRate {
                new_max: rust_decimal::Decimal::ONE,
            },
            Command::SetReserveUsdt { amount: tokens(1) },
            Command::WithdrawReserve { amount: tokens(1) },
            Command::EmergencyWithdraw {
                to: stranger,
                amount: tokens(1),
            },
        ] {
            let (after, result) = run(&state, stranger, command);
            assert!(matches!(result, Err(GenbitError::AccessDenied { .. })));
            assert_eq!(after, state);
        }
    }

    #[test]
    fn emergency_withdraw_needs_treasury_funds() {
        let (state, owner) = genesis();
        let (after, result) = run(
            &state,
            owner,
            Command::EmergencyWithdraw {
                to: owner,
                amount: tokens(1),
            },
        );
        assert!(matches!(result, Err(GenbitError::InsufficientBalance { .. })));
        assert_eq!(after, state);
    }
}
