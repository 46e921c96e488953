//! Adapters turning uploaded bytes into import tables.

mod csv_file;

pub use csv_file::{csv_template, parse_csv};
