//! Test helpers for generating distinct test data
//!
//! Display names must be unique within a room, and room-level tests often
//! need a full roster of distinct names. These helpers keep that noise out of
//! the test bodies.

/// Generate `count` distinct display names sharing a prefix.
///
/// Names are stable (`P1`, `P2`, ...) so assertions can refer to them.
pub fn roster_names(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}{i}")).collect()
}
