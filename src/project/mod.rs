//! Phases, tasks, and their placement.
//!
//! This module keeps every task at a stable position inside its phase and
//! status column and rearranges tasks without renumbering their siblings. It
//! follows hexagonal architecture:
//!
//! - Domain types and move planning in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
