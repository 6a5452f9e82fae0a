//! Identifiers used throughout GenBit.
//!
//! Accounts are 20-byte addresses supplied by the surrounding execution
//! layer. Orders are numbered by a monotonic counter owned by the book.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GenbitError, constants};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Account identity. Authentication of the caller is the execution layer's job;
/// GenBit only compares addresses.
///
/// Serialized as `0x`-prefixed hex so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The exchange's own custody account. Collected tax lands here.
    pub const TREASURY: Self = Self(constants::TREASURY_ADDRESS);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `byte`. Handy for fixtures.
    #[must_use]
    pub fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = GenbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| GenbitError::invalid(format!("address {s:?}: {e}")))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| GenbitError::invalid(format!("address {s:?} is not 20 bytes")))?;
        Ok(Self(bytes))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = GenbitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Order identifier, assigned monotonically at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}
