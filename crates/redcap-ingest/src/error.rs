//! Error types for source table ingestion.

use std::path::PathBuf;
use thiserror::Error;

use redcap_model::ModelError;

/// Errors that can occur while reading or writing tables and dictionary files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source cannot be opened (permissions, missing file, I/O failure).
    #[error("cannot read {path}: {source}")]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Content Errors ===
    /// Source has no rows to process.
    #[error("table is empty: {path}")]
    EmptySource { path: PathBuf },

    /// Source content could not be parsed as a table.
    #[error("failed to parse {path}: {message}")]
    MalformedSource { path: PathBuf, message: String },

    /// Failed to persist a rewritten table.
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    // === Dictionary File Errors ===
    /// Dictionary file could not be read or written.
    #[error("dictionary file {path}: {message}")]
    DictionaryCsv { path: PathBuf, message: String },

    /// Dictionary could not be serialized.
    #[error("failed to serialize dictionary: {message}")]
    Serialize { message: String },

    /// A dictionary row carries an invalid value.
    #[error("invalid dictionary row {line} in {path}: {source}")]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
