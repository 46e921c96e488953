//! CSV parsing and template generation backed by the `csv` crate.

use crate::import::domain::{ImportError, ImportField, RawRecord, RawTable, Truncation};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::Read;

/// Parses a CSV upload, keeping at most `max_rows` data rows.
///
/// The first record is the header row. Rows may have fewer or more cells
/// than the header, and rows whose cells are all blank are ignored. Row
/// numbers are source line numbers, so the first data row is usually 2.
///
/// # Errors
///
/// Returns [`ImportError::EmptyInput`] when there is no header row and
/// [`ImportError::Csv`] for malformed input.
pub fn parse_csv<R: Read>(input: R, max_rows: usize) -> Result<RawTable, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_owned)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(ImportError::EmptyInput);
    }

    let mut rows = Vec::new();
    let mut original_rows = 0_usize;
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        original_rows += 1;
        if rows.len() < max_rows {
            let row_number = record
                .position()
                .and_then(|position| usize::try_from(position.line()).ok())
                .unwrap_or(index + 2);
            rows.push(RawRecord {
                row_number,
                cells: record.iter().map(str::to_owned).collect(),
            });
        }
    }

    let truncation = (original_rows > rows.len()).then(|| Truncation {
        original_rows,
        kept_rows: rows.len(),
    });
    Ok(RawTable {
        headers,
        rows,
        truncation,
    })
}

/// Returns a CSV document holding only the header row, one column per
/// import field.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] if the writer fails.
pub fn csv_template() -> Result<String, ImportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(ImportField::ALL.iter().map(|field| field.header()))
        .map_err(csv_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ImportError::Csv(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ImportError::Csv(err.to_string()))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn csv_error(err: csv::Error) -> ImportError {
    ImportError::Csv(err.to_string())
}
