//! Raw tabular upload data.

use serde::{Deserialize, Serialize};

/// One data row of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Line number in the source file; the header is line 1.
    pub row_number: usize,
    /// Cell values in column order.
    pub cells: Vec<String>,
}

/// Report of rows dropped by the row ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Data rows in the upload.
    pub original_rows: usize,
    /// Data rows kept.
    pub kept_rows: usize,
}

/// Parsed upload: headers, kept rows, and any truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header cells.
    pub headers: Vec<String>,
    /// Kept data rows.
    pub rows: Vec<RawRecord>,
    /// Set when rows were dropped.
    pub truncation: Option<Truncation>,
}
