use anyhow::Result;

use redcap_cli::pipeline::{self, BuildConfig, BuildResult, DuplicatesResult};
use redcap_model::HeaderNamespaceMode;

use crate::cli::{BuildArgs, DuplicatesArgs};

pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let mut config = BuildConfig::new(&args.source_dir);
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    config.report_path = args.report.clone();
    config.check_duplicates = args.check_duplicates;
    config.options = config
        .options
        .with_persist_headers(!args.dry_run)
        .with_header_namespace(if args.shared_header_namespace {
            HeaderNamespaceMode::SharedWithFields
        } else {
            HeaderNamespaceMode::Separate
        });
    pipeline::run_build(&config)
}

pub fn run_duplicates(args: &DuplicatesArgs) -> Result<DuplicatesResult> {
    pipeline::run_duplicates(&args.dictionary)
}
