//! Integration tests for build and lint runs on disk.

use std::fs;
use std::path::Path;

use redcap_cli::pipeline::{BuildConfig, default_output_path, run_build, run_duplicates};
use redcap_model::{BuildOptions, SuspectPair};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn default_output_lives_in_output_subfolder() {
    let path = default_output_path(Path::new("exports"));
    assert_eq!(path, Path::new("exports/output/redcap_data_dictionary.csv"));
}

#[test]
fn build_writes_dictionary_and_report() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vitals.csv", "Weight,Weight_0\n70,71\n80,81\n");
    let report_path = dir.path().join("output").join("report.json");

    let mut config = BuildConfig::new(dir.path());
    config.report_path = Some(report_path.clone());
    config.check_duplicates = true;
    let result = run_build(&config).unwrap();

    assert!(!result.has_errors);
    let output = result.output_path.clone().unwrap();
    assert_eq!(output, default_output_path(dir.path()));
    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("weight,Vitals,"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["tables"][0]["form_name"], "Vitals");
    assert_eq!(json["dictionary"]["records"].as_array().unwrap().len(), 2);

    let pairs: Vec<SuspectPair> = result.suspects.unwrap().into_iter().collect();
    assert_eq!(pairs, vec![SuspectPair::new("weight_0", "weight")]);
}

#[test]
fn rerun_does_not_pick_up_its_own_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "visits.csv", "Visit Date,Score\n2024-01-01,3\n");

    let config = BuildConfig::new(dir.path());
    let first = run_build(&config).unwrap();
    let second = run_build(&config).unwrap();

    assert_eq!(first.report.dictionary, second.report.dictionary);
    assert_eq!(second.report.tables.len(), 1);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "labs.csv", "Test Name,Value\nHb,13\n");

    let mut config = BuildConfig::new(dir.path());
    config.options = BuildOptions::dry_run();
    config.report_path = Some(dir.path().join("report.json"));
    let result = run_build(&config).unwrap();

    assert!(config.is_dry_run());
    assert!(result.output_path.is_none());
    assert!(result.report_path.is_none());
    assert_eq!(result.report.dictionary.len(), 2);
    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("report.json").exists());
    let labs = fs::read_to_string(dir.path().join("labs.csv")).unwrap();
    assert!(labs.starts_with("Test Name,Value"));
}

#[test]
fn skipped_tables_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "empty.csv", "");
    write(dir.path(), "header_only.csv", "a,b\n");
    write(dir.path(), "good.csv", "id\n1\n");

    let result = run_build(&BuildConfig::new(dir.path())).unwrap();

    assert!(!result.has_errors);
    assert_eq!(result.report.skipped.len(), 2);
    assert_eq!(result.report.tables.len(), 1);
    assert_eq!(result.report.tables[0].table.file_name, "good.csv");
}

#[test]
fn output_inside_source_folder_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "visits.csv", "Visit,Score\n1,3\n");

    let mut config = BuildConfig::new(dir.path());
    config.output_path = dir.path().join("dictionary.csv");
    let error = run_build(&config).unwrap_err();

    assert!(error.to_string().contains("would be read as a source table"));
    assert!(!dir.path().join("dictionary.csv").exists());
    let visits = fs::read_to_string(dir.path().join("visits.csv")).unwrap();
    assert!(visits.starts_with("Visit,Score"));
}

#[test]
fn empty_header_name_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.csv", "id,,age\n1,2,3\n");
    write(dir.path(), "good.csv", "id\n1\n");

    let result = run_build(&BuildConfig::new(dir.path())).unwrap();

    assert!(result.has_errors);
    assert_eq!(result.report.tables.len(), 1);
    assert_eq!(result.report.tables[0].table.file_name, "good.csv");
    let bad = fs::read_to_string(dir.path().join("bad.csv")).unwrap();
    assert_eq!(bad, "id,,age\n1,2,3\n");
}

#[test]
fn missing_source_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuildConfig::new(dir.path().join("missing"));
    assert!(run_build(&config).is_err());
}

#[test]
fn duplicates_reads_a_written_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "scores.csv",
        "score,score_0,total_10,rank_0\n1,2,3,4\n",
    );
    let result = run_build(&BuildConfig::new(dir.path())).unwrap();
    let dictionary = result.output_path.unwrap();

    let lint = run_duplicates(&dictionary).unwrap();

    assert_eq!(lint.variables, 4);
    assert_eq!(lint.suspect_names, vec!["score_0", "total_10", "rank_0"]);
    let pairs: Vec<SuspectPair> = lint.pairs.into_iter().collect();
    assert_eq!(pairs, vec![SuspectPair::new("score_0", "score")]);
}
