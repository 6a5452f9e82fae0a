//! System-wide constants for the GenBit ledger and exchange.

/// Number of decimal places in the fixed-point token representation.
pub const TOKEN_DECIMALS: u32 = 18;

/// Smallest units per whole token (10^18).
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Total supply minted at genesis, in whole tokens.
pub const GENESIS_SUPPLY_TOKENS: u64 = 21_000_000;

/// Default tax ceiling, in percent.
pub const DEFAULT_MAX_TAX_RATE_PCT: u32 = 4;

/// Hard ceiling any owner-configured tax rate must stay under, in percent.
pub const TAX_RATE_CEILING_PCT: u32 = 25;

/// Decimal places kept on an effective tax rate (percent).
pub const TAX_RATE_PRECISION: u32 = 4;

/// Default volume (whole tokens) at which the hyperbolic tax decay halves the rate.
pub const DEFAULT_TAX_HALF_VOLUME_TOKENS: u64 = 1_000_000;

/// Reserve low-water mark, in whole tokens of the quote currency.
pub const RESERVE_FLOOR_TOKENS: u64 = 20_000;

/// Level an injection restores the reserve to, in whole tokens.
pub const DEFAULT_RESERVE_TARGET_TOKENS: u64 = 25_000;

/// Reserve balance at genesis, in whole tokens.
pub const DEFAULT_INITIAL_RESERVE_TOKENS: u64 = 100_000;

/// Maximum proposal text length, in characters.
pub const MAX_PROPOSAL_LEN: usize = 256;

/// Address of the exchange's own custody account (tax treasury).
pub const TREASURY_ADDRESS: [u8; 20] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x0e, 0x6b,
];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "GenBit";
