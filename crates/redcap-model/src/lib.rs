//! Data model for clinical data dictionaries.
//!
//! A [`Dictionary`] is an ordered list of [`MetadataRecord`]s, one per source
//! column, carrying the destination identifiers, the form grouping and the
//! inferred field and validation types.

pub mod dictionary;
pub mod enums;
pub mod error;
pub mod options;
pub mod record;

pub use dictionary::{Dictionary, FormSummary, SuspectPair};
pub use enums::{FieldType, ValidationType, ValueKind};
pub use error::{ModelError, Result};
pub use options::{
    BuildOptions, FIELD_PREFIX, HEADER_PREFIX, HeaderNamespaceMode, VARIABLE_PREFIX,
};
pub use record::{DICTIONARY_COLUMNS, DictionaryRow, MetadataRecord, REQUIRED_FLAG};
