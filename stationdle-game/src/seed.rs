//! Seed derivation for target selection.
//!
//! Daily puzzles hash the day number under a fixed domain tag so that every
//! player on the same day faces the same target.

use hmac::{Hmac, Mac};
use sha2::Sha256;

const DAILY_TAG: &[u8] = b"stationdle-daily";

/// Derive an independent seed for `domain_tag` from a user-visible seed.
#[must_use]
pub fn derive_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Seed for the puzzle of a given day, counted from any fixed epoch.
#[must_use]
pub fn daily_seed(day: u32) -> u64 {
    derive_seed(u64::from(day), DAILY_TAG)
}
