//! Data dictionary engine.
//!
//! Turns a set of source tables into a [`Dictionary`](redcap_model::Dictionary):
//!
//! - [`names`]: identifier normalization within explicit namespaces
//! - [`inference`]: field type and validation bounds from column dtypes
//! - [`builder`]: the two-stage build over a [`TableSource`](redcap_ingest::TableSource)
//! - [`duplicates`]: lint for identifiers differing only by a zero suffix
//!
//! # Example
//!
//! ```ignore
//! use redcap_dictionary::{DictionaryBuilder, find_dictionary_suspects};
//! use redcap_ingest::CsvDirectory;
//! use redcap_model::BuildOptions;
//!
//! let report = DictionaryBuilder::new(BuildOptions::default())
//!     .build(&CsvDirectory::new("exports/"))?;
//! for pair in find_dictionary_suspects(&report.dictionary) {
//!     println!("{} ~ {}", pair.name, pair.canonical);
//! }
//! ```

pub mod builder;
pub mod duplicates;
pub mod error;
pub mod inference;
pub mod names;

pub use builder::{
    BuildReport, BuildStage, DictionaryBuilder, HeaderRename, SkipReason, SkippedTable,
    TableSummary, form_name,
};
pub use duplicates::{
    canonical_form, find_dictionary_suspects, find_suspects, is_suspect, suspect_names,
};
pub use error::{BuildError, NameError, Result};
pub use inference::{InferredType, infer_column, value_kind};
pub use names::{Namespace, clean_name, is_valid_identifier};
