//! Error types for dictionary builds.

use thiserror::Error;

use redcap_ingest::IngestError;

/// Invalid input to the identifier normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// An empty raw name cannot produce a unique identifier.
    #[error("empty name cannot be normalized in the {namespace} namespace")]
    EmptyName { namespace: &'static str },

    /// A batch of column names contains an empty name.
    #[error("column {position} has an empty name ({namespace} namespace)")]
    EmptyColumnName {
        namespace: &'static str,
        position: usize,
    },
}

/// Errors raised while building a dictionary.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Reading, writing or listing source tables failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A column name could not be normalized.
    #[error("invalid identifier input in {table}: {source}")]
    InvalidIdentifierInput {
        table: String,
        #[source]
        source: NameError,
    },

    /// A DataFrame operation failed while renaming columns.
    #[error("failed to rename columns of {table}: {message}")]
    Frame { table: String, message: String },
}

impl BuildError {
    /// Returns true when the error stems from an empty raw column name.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifierInput { .. })
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
