//! Unit tests for the dependency graph and service.
