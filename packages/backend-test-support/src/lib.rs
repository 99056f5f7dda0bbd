//! Seraph test support utilities
//!
//! This crate provides utilities shared by the backend integration tests:
//! unified logging initialization, problem-details assertions and distinct
//! test data helpers.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
