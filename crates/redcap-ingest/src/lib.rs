//! Source table ingestion for data dictionary builds.
//!
//! This crate is the I/O side of a build: it discovers CSV extracts in a
//! folder, loads them into Polars DataFrames with whole-file type inference,
//! rewrites their header records in place, and reads and writes the flat
//! dictionary file.
//!
//! # Example
//!
//! ```ignore
//! use redcap_ingest::{CsvDirectory, TableSource};
//!
//! let source = CsvDirectory::new("exports/");
//! for table in source.list_tables()? {
//!     let df = source.read_table(&table)?;
//!     println!("{}: {} rows", table.name, df.height());
//! }
//! ```

mod dictionary_io;
mod discovery;
mod error;
mod frame;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Tables ===
pub use frame::{read_csv_frame, read_header_record, rewrite_header_record};

// === Discovery ===
pub use discovery::{is_csv_path, list_csv_files, table_name};

// === Table Sources ===
pub use source::{CsvDirectory, TableRef, TableSource};

// === Dictionary Files ===
pub use dictionary_io::{dictionary_to_csv_string, read_dictionary_csv, write_dictionary_csv};
