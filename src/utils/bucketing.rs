//! Stable hashing of product identifiers.
//!
//! The external review API only answers group-level queries, so every product
//! is mapped onto one of a fixed set of group labels. The same hash seeds the
//! fallback review generator.

use sha2::{Digest, Sha256};

use crate::domain::entities::ProductId;

/// Group labels accepted by the review API, in bucket order.
pub const PRODUCT_GROUPS: [&str; 5] = ["clothing", "accessories", "drinkware", "stationery", "tech"];

/// Process-independent 64-bit hash of an identifier.
///
/// First eight bytes of the SHA-256 digest, big-endian. Unlike
/// `std::hash::Hash` the value is stable across runs and platforms.
pub fn stable_hash(value: &str) -> u64 {
    let digest = Sha256::digest(value.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Maps a product onto the review API group that stands in for it.
pub fn product_group(product_id: &ProductId) -> &'static str {
    let bucket = stable_hash(product_id.as_str()) % PRODUCT_GROUPS.len() as u64;
    PRODUCT_GROUPS[bucket as usize]
}
