//! Typed dependencies between tasks.
//!
//! Dependencies form a directed graph per project. Sequencing edges
//! (finish-to-start and friends, and `blocks`) must stay acyclic; `relates_to`
//! and `duplicates` are informational and never take part in cycle checks.
//! Each edge is stored once and viewed from both endpoints, relabelled for the
//! viewing side. The module follows hexagonal architecture:
//!
//! - Domain types and the graph in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
