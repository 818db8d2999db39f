//! CLI integration tests against legacy project layouts.

mod common;

mod diff_tests;
mod upgrade_tests;
