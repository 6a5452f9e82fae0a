//! Shared fixtures for the exchange integration suites.

#![allow(dead_code)]

use genbit_exchange::Exchange;
use genbit_types::{Address, Amount, GenesisConfig, Price};
use tracing_subscriber::EnvFilter;

pub const OWNER: Address = Address([0xaa; 20]);
pub const ADDR1: Address = Address([0x01; 20]);
pub const ADDR2: Address = Address([0x02; 20]);

/// Route engine logs through the test harness. `RUST_LOG=genbit_matchcore=debug` shows every fill.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n)
}

pub fn price(n: u64) -> Price {
    Price::from_tokens(n)
}

pub fn exchange() -> Exchange {
    init_tracing();
    Exchange::initialize(OWNER, &GenesisConfig::default()).unwrap()
}
