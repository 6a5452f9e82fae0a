//! Fill root: a single hash over everything a match round produced.
//!
//! Two replicas that start from the same state and run the same calls must
//! agree on every fill, including the tax rate it executed at. Comparing
//! `fill_root`s is enough to check that without shipping the fills.

use genbit_types::Fill;
use sha2::{Digest, Sha256};

/// Compute the fill root over an ordered slice of fills.
///
/// The same fills in the same order always produce the same root; swapping
/// two fills changes it.
#[must_use]
pub fn compute_fill_root(fills: &[Fill]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"genbit:fill_root:v1:");
    hasher.update((fills.len() as u64).to_le_bytes());

    for fill in fills {
        hasher.update(fill.sequence.to_le_bytes());
        hasher.update(fill.buy_order_id.0.to_le_bytes());
        hasher.update(fill.sell_order_id.0.to_le_bytes());
        hasher.update(fill.buyer.as_bytes());
        hasher.update(fill.seller.as_bytes());
        hasher.update(fill.amount.units().to_le_bytes());
        hasher.update(fill.price.units().to_le_bytes());
        hasher.update(fill.tax_rate.normalize().to_string().as_bytes());
        hasher.update(fill.tax.units().to_le_bytes());
        hasher.update(fill.net.units().to_le_bytes());
    }

    hasher.finalize().into()
}

#[must_use]
pub fn verify_fill_root(fills: &[Fill], expected_root: &[u8; 32]) -> bool {
    compute_fill_root(fills) == *expected_root
}
