//! Dictionary assembly over a set of source tables.
//!
//! A build runs in two stages:
//! 1. **Headers**: every table's raw header record is normalized in one
//!    header namespace shared by all tables, and the new names replace the
//!    old header in the source. Cell values are never rewritten.
//! 2. **Describe**: each table is read again, and every column gets a
//!    variable identifier, a field identifier and an inferred type, derived
//!    from the already rewritten header.
//!
//! A table that fails in either stage is logged and skipped; the run goes on
//! with the next table.

use std::path::PathBuf;
use std::time::Instant;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use redcap_ingest::{IngestError, TableRef, TableSource};
use redcap_model::{BuildOptions, Dictionary, HEADER_PREFIX, HeaderNamespaceMode, MetadataRecord};

use crate::error::{BuildError, Result};
use crate::inference::infer_column;
use crate::names::Namespace;

/// Stage of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStage {
    Headers,
    Describe,
}

/// Why a table was left out of the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnreadableSource,
    EmptySource,
    MalformedSource,
    WriteFailed,
    InvalidIdentifierInput,
}

impl SkipReason {
    fn of(error: &BuildError) -> Self {
        match error {
            BuildError::Ingest(IngestError::UnreadableSource { .. }) => Self::UnreadableSource,
            BuildError::Ingest(IngestError::EmptySource { .. }) => Self::EmptySource,
            BuildError::Ingest(IngestError::WriteFailed { .. }) => Self::WriteFailed,
            BuildError::InvalidIdentifierInput { .. } => Self::InvalidIdentifierInput,
            BuildError::Ingest(_) | BuildError::Frame { .. } => Self::MalformedSource,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnreadableSource => "unreadable",
            SkipReason::EmptySource => "empty",
            SkipReason::MalformedSource => "malformed",
            SkipReason::WriteFailed => "write failed",
            SkipReason::InvalidIdentifierInput => "invalid identifier",
        }
    }
}

/// A table that contributed no records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTable {
    pub table: TableRef,
    pub stage: BuildStage,
    pub reason: SkipReason,
    pub message: String,
}

/// Header rename applied to one table during the header stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRename {
    pub table: TableRef,
    pub original: Vec<String>,
    pub renamed: Vec<String>,
}

/// A table that contributed records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: TableRef,
    pub form_name: String,
    pub rows: usize,
    pub fields: usize,
}

/// Outcome of a build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub dictionary: Dictionary,
    pub tables: Vec<TableSummary>,
    pub skipped: Vec<SkippedTable>,
    pub header_renames: Vec<HeaderRename>,
}

impl BuildReport {
    /// True when a table was rejected for invalid identifier input.
    pub fn has_errors(&self) -> bool {
        self.skipped
            .iter()
            .any(|s| s.reason == SkipReason::InvalidIdentifierInput)
    }
}

/// Builds a dictionary from a [`TableSource`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    options: BuildOptions,
}

impl DictionaryBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Runs both stages over every table of `source`.
    ///
    /// Only listing the source can fail the whole build; per-table failures
    /// are recorded in [`BuildReport::skipped`]. A run in which every table
    /// is skipped yields an empty dictionary.
    pub fn build<S: TableSource + ?Sized>(&self, source: &S) -> Result<BuildReport> {
        let build_span = info_span!("build");
        let _build_guard = build_span.enter();
        let start = Instant::now();

        let tables = source.list_tables()?;
        info!(table_count = tables.len(), "building dictionary");

        let mut variables = Namespace::variables();
        let mut fields = Namespace::fields();
        let mut headers = Namespace::headers();
        let mut report = BuildReport::default();

        // Stage 1: rewrite headers in a namespace shared by all tables.
        {
            let header_namespace = match self.options.header_namespace {
                HeaderNamespaceMode::Separate => &mut headers,
                HeaderNamespaceMode::SharedWithFields => &mut fields,
            };
            let stage_span = info_span!("headers", namespace = header_namespace.label());
            let _stage_guard = stage_span.enter();
            for table in &tables {
                match self.rewrite_headers(source, table, header_namespace) {
                    Ok(rename) => report.header_renames.push(rename),
                    Err(error) => skip(&mut report, table, BuildStage::Headers, &error),
                }
            }
        }

        // Stage 2: derive one record per column.
        {
            let stage_span = info_span!("describe");
            let _stage_guard = stage_span.enter();
            let renames = std::mem::take(&mut report.header_renames);
            for rename in &renames {
                match self.describe_table(source, rename, &mut variables, &mut fields) {
                    Ok((summary, records)) => {
                        debug!(
                            table = %rename.table.name,
                            form = %summary.form_name,
                            fields = summary.fields,
                            "described table"
                        );
                        report.tables.push(summary);
                        for record in records {
                            report.dictionary.push(record);
                        }
                    }
                    Err(error) => skip(&mut report, &rename.table, BuildStage::Describe, &error),
                }
            }
            report.header_renames = renames;
        }

        info!(
            tables = report.tables.len(),
            skipped = report.skipped.len(),
            records = report.dictionary.len(),
            duration_ms = start.elapsed().as_millis(),
            "dictionary complete"
        );
        Ok(report)
    }

    fn rewrite_headers<S: TableSource + ?Sized>(
        &self,
        source: &S,
        table: &TableRef,
        namespace: &mut Namespace,
    ) -> Result<HeaderRename> {
        let original = source.read_headers(table)?;
        let renamed = namespace
            .normalize_all_as(original.iter().map(String::as_str), HEADER_PREFIX)
            .map_err(|source| BuildError::InvalidIdentifierInput {
                table: table.name.clone(),
                source,
            })?;

        if self.options.persist_headers {
            source.write_headers(table, &renamed)?;
            debug!(table = %table.name, columns = renamed.len(), "rewrote headers");
        } else {
            debug!(table = %table.name, columns = renamed.len(), "renamed headers in memory");
        }

        Ok(HeaderRename {
            table: table.clone(),
            original,
            renamed,
        })
    }

    fn describe_table<S: TableSource + ?Sized>(
        &self,
        source: &S,
        rename: &HeaderRename,
        variables: &mut Namespace,
        fields: &mut Namespace,
    ) -> Result<(TableSummary, Vec<MetadataRecord>)> {
        let table = &rename.table;
        let mut frame = source.read_table(table)?;
        // Frame names may be reader-generated; the header stage names win.
        rename_columns(&mut frame, &rename.renamed, table)?;
        if frame.height() == 0 {
            return Err(IngestError::EmptySource {
                path: PathBuf::from(&table.file_name),
            }
            .into());
        }

        let form_name = form_name(&table.name);
        let names = &rename.renamed;
        let invalid = |source| BuildError::InvalidIdentifierInput {
            table: table.name.clone(),
            source,
        };
        let variable_names = variables
            .normalize_all(names.iter().map(String::as_str))
            .map_err(invalid)?;
        let field_names = fields
            .normalize_all(names.iter().map(String::as_str))
            .map_err(invalid)?;

        let records: Vec<MetadataRecord> = frame
            .get_columns()
            .iter()
            .zip(variable_names)
            .zip(field_names)
            .map(|((column, variable_name), field_name)| {
                let inferred = infer_column(column);
                MetadataRecord::new(variable_name, form_name.as_str(), field_name)
                    .with_type(inferred.field_type, inferred.validation)
                    .with_bounds(inferred.min, inferred.max)
            })
            .collect();

        let summary = TableSummary {
            table: table.clone(),
            form_name,
            rows: frame.height(),
            fields: records.len(),
        };
        Ok((summary, records))
    }
}

/// Form name of a table: underscores become spaces, then the first
/// character is upper-cased and the rest lower-cased.
pub fn form_name(table_name: &str) -> String {
    let spaced = table_name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn rename_columns(frame: &mut DataFrame, names: &[String], table: &TableRef) -> Result<()> {
    if frame.width() != names.len() {
        return Err(BuildError::Frame {
            table: table.name.clone(),
            message: format!(
                "header has {} names but the table has {} columns",
                names.len(),
                frame.width()
            ),
        });
    }
    frame
        .set_column_names(names.iter().map(String::as_str))
        .map_err(|e| BuildError::Frame {
            table: table.name.clone(),
            message: e.to_string(),
        })
}

fn skip(report: &mut BuildReport, table: &TableRef, stage: BuildStage, error: &BuildError) {
    if error.is_invalid_identifier() {
        error!(table = %table.file_name, stage = ?stage, %error, "rejected table");
    } else {
        warn!(table = %table.file_name, stage = ?stage, %error, "skipping table");
    }
    report.skipped.push(SkippedTable {
        table: table.clone(),
        stage,
        reason: SkipReason::of(error),
        message: error.to_string(),
    });
}
