//! In-memory adapter for dependency persistence.

mod dependency;

pub use dependency::InMemoryDependencyRepository;
