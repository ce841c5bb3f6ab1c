//! Configuration options for dictionary builds.

use serde::{Deserialize, Serialize};

/// Prefix for variable identifiers that would start with a digit or underscore.
pub const VARIABLE_PREFIX: &str = "var_";
/// Prefix for field identifiers.
pub const FIELD_PREFIX: &str = "field_";
/// Prefix for rewritten table headers.
pub const HEADER_PREFIX: &str = "hdr_";

/// Which namespace receives the rewritten table headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderNamespaceMode {
    /// Headers get their own transient namespace, shared across all tables
    /// of a run and discarded afterwards.
    #[default]
    Separate,
    /// Headers register into the field namespace, so a header name blocks
    /// the same text from later being used as a field identifier.
    SharedWithFields,
}

/// Options controlling a dictionary build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Namespace used for header cleanup.
    pub header_namespace: HeaderNamespaceMode,

    /// Write renamed headers back to the source tables.
    ///
    /// When false the source is left untouched and the renamed headers are
    /// applied in memory only.
    pub persist_headers: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            header_namespace: HeaderNamespaceMode::default(),
            persist_headers: true,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a run that never modifies its sources.
    pub fn dry_run() -> Self {
        Self {
            persist_headers: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header_namespace(mut self, mode: HeaderNamespaceMode) -> Self {
        self.header_namespace = mode;
        self
    }

    #[must_use]
    pub fn with_persist_headers(mut self, persist: bool) -> Self {
        self.persist_headers = persist;
        self
    }
}
