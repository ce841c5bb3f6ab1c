//! Table sources consumed by the dictionary builder.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::{list_csv_files, table_name};
use crate::error::Result;
use crate::frame::{read_csv_frame, read_header_record, rewrite_header_record};

/// A named table as discovered in a source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Base name without extension; the form name is derived from it.
    pub name: String,
    /// Source file name, used for reporting.
    pub file_name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self::new(table_name(path), file_name)
    }
}

/// A collection of tables that can be listed, read and renamed.
///
/// Reads and writes are independent per table: a failure on one table must
/// not affect the others.
pub trait TableSource {
    /// Tables in discovery order.
    fn list_tables(&self) -> Result<Vec<TableRef>>;

    /// Column names exactly as stored, repeats and blanks included.
    fn read_headers(&self, table: &TableRef) -> Result<Vec<String>>;

    /// Loads a table for type inference. Each call re-reads the source.
    ///
    /// Column names of the frame may differ from [`read_headers`](Self::read_headers)
    /// when the stored names repeat.
    fn read_table(&self, table: &TableRef) -> Result<DataFrame>;

    /// Replaces the stored column names; cell values are never touched.
    fn write_headers(&self, table: &TableRef, names: &[String]) -> Result<()>;
}

/// A directory of CSV extracts.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a table's backing file.
    pub fn path_of(&self, table: &TableRef) -> PathBuf {
        self.root.join(&table.file_name)
    }
}

impl TableSource for CsvDirectory {
    fn list_tables(&self) -> Result<Vec<TableRef>> {
        let files = list_csv_files(&self.root)?;
        debug!(
            root = %self.root.display(),
            table_count = files.len(),
            "discovered csv tables"
        );
        Ok(files.iter().map(|path| TableRef::from_path(path)).collect())
    }

    fn read_headers(&self, table: &TableRef) -> Result<Vec<String>> {
        read_header_record(&self.path_of(table))
    }

    fn read_table(&self, table: &TableRef) -> Result<DataFrame> {
        read_csv_frame(&self.path_of(table))
    }

    fn write_headers(&self, table: &TableRef, names: &[String]) -> Result<()> {
        rewrite_header_record(&self.path_of(table), names)
    }
}
