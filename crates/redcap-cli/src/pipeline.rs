//! Build and lint runs over the on-disk collaborators.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span};

use redcap_dictionary::{BuildReport, DictionaryBuilder, find_dictionary_suspects, suspect_names};
use redcap_ingest::{CsvDirectory, is_csv_path, read_dictionary_csv, write_dictionary_csv};
use redcap_model::{BuildOptions, SuspectPair};

/// File name of the generated dictionary.
pub const DICTIONARY_FILE_NAME: &str = "redcap_data_dictionary.csv";

/// Default dictionary location for a source directory.
pub fn default_output_path(source_dir: &Path) -> PathBuf {
    source_dir.join("output").join(DICTIONARY_FILE_NAME)
}

/// Inputs of a build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub options: BuildOptions,
    pub check_duplicates: bool,
}

impl BuildConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let output_path = default_output_path(&source_dir);
        Self {
            source_dir,
            output_path,
            report_path: None,
            options: BuildOptions::default(),
            check_duplicates: false,
        }
    }

    /// True when nothing may be written, neither headers nor outputs.
    pub fn is_dry_run(&self) -> bool {
        !self.options.persist_headers
    }
}

/// Outcome of a build run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub source_dir: PathBuf,
    /// Written dictionary, `None` on a dry run.
    pub output_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub report: BuildReport,
    /// Suspect pairs when the duplicate lint was requested.
    pub suspects: Option<BTreeSet<SuspectPair>>,
    pub has_errors: bool,
}

/// Builds the dictionary for `config.source_dir` and writes the outputs.
pub fn run_build(config: &BuildConfig) -> Result<BuildResult> {
    let span = info_span!("run", source = %config.source_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    for path in [Some(&config.output_path), config.report_path.as_ref()]
        .into_iter()
        .flatten()
    {
        if is_discoverable_output(path, &config.source_dir) {
            bail!(
                "output {} is a CSV file directly inside {} and would be read as a source table",
                path.display(),
                config.source_dir.display()
            );
        }
    }

    let source = CsvDirectory::new(&config.source_dir);
    let report = DictionaryBuilder::new(config.options.clone())
        .build(&source)
        .with_context(|| format!("build dictionary from {}", config.source_dir.display()))?;

    let suspects = config
        .check_duplicates
        .then(|| find_dictionary_suspects(&report.dictionary));

    let mut output_path = None;
    let mut report_path = None;
    if !config.is_dry_run() {
        ensure_parent(&config.output_path)?;
        write_dictionary_csv(&report.dictionary, &config.output_path)
            .with_context(|| format!("write {}", config.output_path.display()))?;
        output_path = Some(config.output_path.clone());
        if let Some(path) = &config.report_path {
            write_json_report(&report, path)?;
            report_path = Some(path.clone());
        }
    }

    info!(
        records = report.dictionary.len(),
        tables = report.tables.len(),
        skipped = report.skipped.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    let has_errors = report.has_errors();
    Ok(BuildResult {
        source_dir: config.source_dir.clone(),
        output_path,
        report_path,
        report,
        suspects,
        has_errors,
    })
}

/// Outcome of a duplicate lint over an existing dictionary file.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatesResult {
    pub dictionary_path: PathBuf,
    pub variables: usize,
    /// Every name whose last segment carries a zero, in dictionary order.
    pub suspect_names: Vec<String>,
    pub pairs: BTreeSet<SuspectPair>,
}

/// Reads a flat dictionary and lints its variable names.
pub fn run_duplicates(path: &Path) -> Result<DuplicatesResult> {
    let dictionary =
        read_dictionary_csv(path).with_context(|| format!("read {}", path.display()))?;
    let names = suspect_names(dictionary.variable_names())
        .into_iter()
        .map(str::to_string)
        .collect();
    let pairs = find_dictionary_suspects(&dictionary);
    info!(
        variables = dictionary.len(),
        pairs = pairs.len(),
        "duplicate lint complete"
    );
    Ok(DuplicatesResult {
        dictionary_path: path.to_path_buf(),
        variables: dictionary.len(),
        suspect_names: names,
        pairs,
    })
}

/// True when a later build of `source_dir` would discover `path` as a table.
fn is_discoverable_output(path: &Path, source_dir: &Path) -> bool {
    if !is_csv_path(path) {
        return false;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), fs::canonicalize(source_dir)) {
        (Ok(parent), Ok(source)) => parent == source,
        _ => false,
    }
}

fn write_json_report(report: &BuildReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report).context("serialize build report")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display())),
        _ => Ok(()),
    }
}
