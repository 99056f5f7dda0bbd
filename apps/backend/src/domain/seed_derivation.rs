//! RNG seed derivation for deterministic sessions.
//!
//! A server started with a base seed hands each new session a distinct but
//! reproducible seed; a server without one seeds each session from OS entropy.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// RNG owned by one session. Every random decision in the session draws from it.
pub type SessionRng = ChaCha8Rng;

/// Derive the seed for the `ordinal`-th session created by a seeded server.
///
/// Uses a SplitMix64 finalizer so neighbouring ordinals produce unrelated
/// seeds.
pub fn derive_session_seed(base_seed: u64, ordinal: u64) -> u64 {
    let mut z = base_seed.wrapping_add(ordinal.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Build a session RNG: seeded when a seed is given, OS entropy otherwise.
pub fn session_rng(seed: Option<u64>) -> SessionRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}
