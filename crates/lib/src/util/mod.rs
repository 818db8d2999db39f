//! Shared utilities.
//!
//! Test helpers for driving the upgrade without a real host.

#[cfg(test)]
pub mod testutil;
