//! CLI argument definitions for the data dictionary generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "redcap-dd",
    version,
    about = "Generate a REDCap data dictionary from a folder of CSV extracts",
    long_about = "Generate a REDCap data dictionary from a folder of CSV extracts.\n\n\
                  Every CSV file becomes a form and every column a field with a\n\
                  unique identifier and an inferred type. Column headers of the\n\
                  source files are rewritten in place unless --dry-run is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the data dictionary for a folder of CSV files.
    Build(BuildArgs),

    /// List variable names that may be zero-suffixed duplicates.
    Duplicates(DuplicatesArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Folder containing the CSV extracts.
    #[arg(value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Dictionary file to write (default: <DIR>/output/redcap_data_dictionary.csv).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the full build report as JSON.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Build and summarize without touching the source files or writing outputs.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Register rewritten headers in the field namespace.
    ///
    /// A header name then blocks the same text from being used as a field
    /// identifier, which shifts field identifiers onto numbered variants.
    #[arg(long = "shared-header-namespace")]
    pub shared_header_namespace: bool,

    /// Run the duplicate lint over the new dictionary.
    #[arg(long = "check-duplicates")]
    pub check_duplicates: bool,
}

#[derive(Parser)]
pub struct DuplicatesArgs {
    /// A dictionary file written by `build`.
    #[arg(value_name = "DICTIONARY_CSV")]
    pub dictionary: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
