//! Seedable uniform shuffling.

use rand::Rng;

/// Fisher-Yates shuffle driven by the caller's RNG.
///
/// Every permutation is equally likely; the same RNG state always yields the
/// same permutation.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Uniform choice of one element, `None` for an empty slice.
pub fn choose<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..items.len());
    items.get(idx)
}
