//! Unit tests for CSV import reconciliation.

mod fixtures;
mod session_tests;
