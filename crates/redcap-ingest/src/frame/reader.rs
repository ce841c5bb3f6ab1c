//! CSV file reading into Polars DataFrames.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Reads a CSV file into a DataFrame with whole-file type inference.
///
/// Every row takes part in schema inference and date-like text is parsed
/// into temporal columns, so each column ends up with one homogeneous dtype.
///
/// A zero-byte file is an [`IngestError::EmptySource`]. A header-only file
/// is returned as a frame with zero rows; callers decide whether that counts
/// as empty.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    // Open failures are I/O errors, not parse errors.
    let file = File::open(path).map_err(|e| IngestError::UnreadableSource {
        path: path.to_path_buf(),
        source: e,
    })?;
    let metadata = file
        .metadata()
        .map_err(|e| IngestError::UnreadableSource {
            path: path.to_path_buf(),
            source: e,
        })?;
    if metadata.len() == 0 {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    drop(file);

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| options.with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| malformed(path, &e))?
        .finish()
        .map_err(|e| malformed(path, &e))
}

fn malformed(path: &Path, error: &PolarsError) -> IngestError {
    IngestError::MalformedSource {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
