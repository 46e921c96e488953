//! Planwright: hierarchical ordering and dependency engine for project plans.
//!
//! The crate keeps a project's phases and tasks in a stable, user-controlled
//! order, maintains hierarchical WBS codes that follow that order, validates
//! task dependency graphs, and reconciles bulk CSV imports into existing
//! plans.
//!
//! # Architecture
//!
//! Planwright follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering, placement, and graph logic
//! - **Ports**: Abstract trait interfaces for persistence and reference data
//! - **Adapters**: Concrete implementations of ports (in-memory, CSV)
//! - **Services**: Async orchestration of domain logic and ports
//!
//! # Modules
//!
//! - [`ordering`]: Fractional order keys and WBS codes
//! - [`project`]: Phases, tasks, moves, and bulk reorders
//! - [`dependency`]: Typed dependency edges with cycle detection
//! - [`import`]: Staged CSV import reconciliation

pub mod dependency;
pub mod import;
pub mod ordering;
pub mod project;
