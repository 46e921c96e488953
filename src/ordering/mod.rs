//! Renumbering-free ordering primitives.
//!
//! Two independent orderings are maintained for phases and tasks:
//!
//! - [`OrderKey`]: fractional-indexing keys over a base-62 alphabet. Byte-wise
//!   comparison of two keys is the authoritative sort order, and a new key can
//!   always be generated between two neighbours without touching either.
//! - [`WbsCode`]: dot-separated work-breakdown codes (`2.3.1`) used for
//!   display. They compare segment-wise and are kept in the same relative
//!   order as the order keys of the records that carry them.
//!
//! Both are pure value types with no persistence or clock dependencies.

mod error;
pub mod order_key;
pub mod wbs;

pub use error::{OrderKeyError, WbsError};
pub use order_key::{OrderKey, key_between, keys_between};
pub use wbs::{WbsCode, code_between, code_between_unused, next_child_code};

#[cfg(test)]
mod tests;
