//! Bulk CSV import of phases and tasks.
//!
//! An import walks through fixed stages: upload, column mapping, preview,
//! agent resolution, status resolution, and commit. Rows are validated
//! against reference data fetched once per preview, grouped into phases by
//! name, and committed row by row so one failing row never aborts the batch.
//!
//! - Domain types and the session state machine in [`domain`]
//! - CSV parsing and template generation in [`adapters`]
//! - The commit orchestration in [`services`]

pub mod adapters;
mod config;
pub mod domain;
pub mod services;

pub use config::ImportConfig;

#[cfg(test)]
mod tests;
