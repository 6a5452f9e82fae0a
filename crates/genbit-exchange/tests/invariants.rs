//! Integration test: invariants under randomized call sequences
//!
//! Seeded runs of mixed commands from several callers. After every call:
//! - supply is conserved, treasury included
//! - a rejected call left the state untouched
//! - adoption progress never decreases, and grows by exactly the volume of
//!   each committed match round
//! - each fill splits its gross amount into net and tax exactly
//!
//! The journal of each run must replay to the identical state.

mod common;

use common::{OWNER, exchange, init_tracing, price, tokens};
use genbit_exchange::{Command, Outcome, UnlimitedQuote, replay};
use genbit_matchcore::TaxController;
use genbit_types::{Address, GenesisConfig, OrderId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const TRADERS: [Address; 4] = [
    Address([0x11; 20]),
    Address([0x22; 20]),
    Address([0x33; 20]),
    Address([0x44; 20]),
];

fn random_caller(rng: &mut StdRng) -> Address {
    if rng.gen_bool(0.2) {
        OWNER
    } else {
        TRADERS[rng.gen_range(0..TRADERS.len())]
    }
}

fn random_command(rng: &mut StdRng, placed: u64) -> Command {
    match rng.gen_range(0..12) {
        0..=1 => Command::Transfer {
            to: TRADERS[rng.gen_range(0..TRADERS.len())],
            amount: tokens(rng.gen_range(0..5_000)),
        },
        2..=3 => Command::PlaceSellOrder {
            amount: tokens(rng.gen_range(0..2_000)),
            price: price(rng.gen_range(1..4)),
        },
        4..=5 => Command::PlaceBuyOrder {
            amount: tokens(rng.gen_range(0..2_000)),
            price: price(rng.gen_range(1..4)),
        },
        6..=7 => Command::MatchOrders,
        8 => Command::CancelOrder {
            order_id: OrderId(rng.gen_range(1..=placed.max(1) + 1)),
        },
        9 => Command::VoteOnProposal {
            proposal: "Reduce Tax".into(),
            choice: rng.gen_bool(0.5),
        },
        10 => Command::SetReserveUsdt {
            amount: tokens(rng.gen_range(0..40_000)),
        },
        _ => Command::CheckAndInjectLiquidity,
    }
}

fn run(seed: u64, calls: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ex = exchange();
    let supply = ex.state().total_supply();
    let mut placed = 0u64;

    for _ in 0..calls {
        let caller = random_caller(&mut rng);
        let command = random_command(&mut rng, placed);
        let before = ex.state().clone();

        match ex.submit(caller, command.clone()) {
            Ok(applied) => {
                let after = ex.state();
                assert!(
                    after.adoption_progress() >= before.adoption_progress(),
                    "seed {seed}: adoption progress went down on {command:?}"
                );
                match applied.outcome {
                    Outcome::OrderPlaced { .. } => placed += 1,
                    Outcome::Matched { report } => {
                        assert_eq!(
                            after.adoption_progress().units(),
                            before.adoption_progress().units() + report.volume.units(),
                            "seed {seed}: progress must grow by round volume"
                        );
                        for fill in &report.fills {
                            assert_eq!(fill.net.units() + fill.tax.units(), fill.amount.units());
                            assert_eq!(fill.tax, TaxController::tax_on(fill.amount, fill.tax_rate).unwrap());
                            assert!(fill.tax_rate >= Decimal::ZERO && fill.tax_rate <= after.max_tax_rate());
                        }
                    }
                    Outcome::LiquidityChecked { injected: Some(_), .. } => {
                        assert!(after.reserve_usdt() > tokens(20_000));
                    }
                    _ => {
                        assert_eq!(after.adoption_progress(), before.adoption_progress());
                    }
                }
            }
            Err(err) => {
                assert_eq!(ex.state(), &before, "seed {seed}: rejected {command:?} ({err}) mutated state");
            }
        }

        assert_eq!(ex.state().ledger().circulating().unwrap(), supply, "seed {seed}");
        ex.state().check_invariants().unwrap();
    }

    let replayed = replay(ex.journal(), UnlimitedQuote).unwrap();
    assert_eq!(replayed.state(), ex.state(), "seed {seed}: replay diverged");
    assert_eq!(replayed.state_hash(), ex.state_hash());
}

#[test]
fn randomized_sequences_hold_invariants() {
    for seed in 0..16 {
        run(seed, 300);
    }
}

#[test]
fn non_owner_match_never_mutates() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut ex = exchange();
    for trader in TRADERS {
        ex.submit(OWNER, Command::Transfer { to: trader, amount: tokens(1_000) }).unwrap();
    }
    for _ in 0..40 {
        let trader = TRADERS[rng.gen_range(0..TRADERS.len())];
        let command = if rng.gen_bool(0.5) {
            Command::PlaceSellOrder {
                amount: tokens(rng.gen_range(1..50)),
                price: price(1),
            }
        } else {
            Command::PlaceBuyOrder {
                amount: tokens(rng.gen_range(1..50)),
                price: price(1),
            }
        };
        let _ = ex.submit(trader, command);

        let before = ex.state().clone();
        let stranger = TRADERS[rng.gen_range(0..TRADERS.len())];
        assert!(ex.submit(stranger, Command::MatchOrders).is_err());
        assert_eq!(ex.state(), &before);
    }
}

#[test]
fn same_calls_same_fills_on_two_exchanges() {
    init_tracing();
    let mut a = genbit_exchange::Exchange::initialize(OWNER, &GenesisConfig::default()).unwrap();
    let mut b = genbit_exchange::Exchange::initialize(OWNER, &GenesisConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let caller = random_caller(&mut rng);
        let command = random_command(&mut rng, 50);
        let ra = a.submit(caller, command.clone());
        let rb = b.submit(caller, command);
        match (ra, rb) {
            (Ok(x), Ok(y)) => assert_eq!(x, y),
            (Err(x), Err(y)) => assert_eq!(x.code(), y.code()),
            (x, y) => panic!("outcomes differ: {x:?} vs {y:?}"),
        }
    }
    assert_eq!(a.state_hash(), b.state_hash());
    assert_eq!(a.journal().head().unwrap(), b.journal().head().unwrap());
}
