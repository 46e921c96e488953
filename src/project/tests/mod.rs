//! Unit tests for the project plan domain and services.

mod fixtures;
mod reorder_tests;
