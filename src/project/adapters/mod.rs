//! Adapter implementations for project plan ports.

pub mod memory;
