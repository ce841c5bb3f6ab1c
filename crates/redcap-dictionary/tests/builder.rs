//! Builder tests over an in-memory table source.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use redcap_dictionary::{BuildStage, DictionaryBuilder, SkipReason};
use redcap_ingest::{IngestError, TableRef, TableSource};
use redcap_model::{BuildOptions, FieldType, HeaderNamespaceMode, ValidationType};

/// A table as held by [`MemorySource`]: its stored header record and the
/// frame a reader would produce for it.
struct StoredTable {
    headers: Vec<String>,
    frame: DataFrame,
}

/// Tables held in memory; `None` marks a table that cannot be opened.
struct MemorySource {
    tables: RefCell<Vec<(TableRef, Option<StoredTable>)>>,
    writes: RefCell<usize>,
}

impl MemorySource {
    fn new() -> Self {
        Self {
            tables: RefCell::new(Vec::new()),
            writes: RefCell::new(0),
        }
    }

    fn with_table(self, name: &str, frame: DataFrame) -> Self {
        let headers = frame
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        self.with_raw_headers(name, headers, frame)
    }

    /// A table whose stored header differs from the frame's column names.
    fn with_raw_headers(self, name: &str, headers: Vec<String>, frame: DataFrame) -> Self {
        let table = TableRef::new(name, format!("{name}.csv"));
        self.tables
            .borrow_mut()
            .push((table, Some(StoredTable { headers, frame })));
        self
    }

    fn with_unreadable(self, name: &str) -> Self {
        let table = TableRef::new(name, format!("{name}.csv"));
        self.tables.borrow_mut().push((table, None));
        self
    }

    fn column_names(&self, name: &str) -> Vec<String> {
        let tables = self.tables.borrow();
        let (_, stored) = tables
            .iter()
            .find(|(table, _)| table.name == name)
            .expect("table exists");
        stored.as_ref().expect("table readable").headers.clone()
    }

    fn stored<T>(
        &self,
        table: &TableRef,
        read: impl FnOnce(&StoredTable) -> T,
    ) -> redcap_ingest::Result<T> {
        let tables = self.tables.borrow();
        match tables.iter().find(|(t, _)| t == table) {
            Some((_, Some(stored))) => Ok(read(stored)),
            _ => Err(IngestError::UnreadableSource {
                path: PathBuf::from(&table.file_name),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
            }),
        }
    }
}

impl TableSource for MemorySource {
    fn list_tables(&self) -> redcap_ingest::Result<Vec<TableRef>> {
        Ok(self.tables.borrow().iter().map(|(t, _)| t.clone()).collect())
    }

    fn read_headers(&self, table: &TableRef) -> redcap_ingest::Result<Vec<String>> {
        self.stored(table, |stored| stored.headers.clone())
    }

    fn read_table(&self, table: &TableRef) -> redcap_ingest::Result<DataFrame> {
        self.stored(table, |stored| stored.frame.clone())
    }

    fn write_headers(&self, table: &TableRef, names: &[String]) -> redcap_ingest::Result<()> {
        let mut tables = self.tables.borrow_mut();
        if let Some((_, Some(stored))) = tables.iter_mut().find(|(t, _)| t == table) {
            stored.headers = names.to_vec();
        }
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

fn int_col(name: &str, values: &[i64]) -> Column {
    Series::new(name.into(), values).into_column()
}

fn str_col(name: &str, values: &[&str]) -> Column {
    Series::new(name.into(), values).into_column()
}

fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).unwrap()
}

#[test]
fn same_header_in_two_tables_gets_distinct_identifiers() {
    let source = MemorySource::new()
        .with_table("orders", frame(vec![int_col("Total$", &[5, 9])]))
        .with_table("orders2", frame(vec![int_col("Total$", &[7])]));

    let report = DictionaryBuilder::default().build(&source).unwrap();

    let fields: Vec<&str> = report.dictionary.field_names().collect();
    let variables: Vec<&str> = report.dictionary.variable_names().collect();
    assert_eq!(fields, vec!["total_", "total__1"]);
    assert_eq!(variables, vec!["total_", "total__1"]);
    assert!(report.dictionary.has_unique_identifiers());

    // Headers are rewritten globally across tables before any record is built.
    assert_eq!(source.column_names("orders"), vec!["total_"]);
    assert_eq!(source.column_names("orders2"), vec!["total__1"]);
}

#[test]
fn shared_header_namespace_pushes_field_suffixes_further() {
    let source = MemorySource::new()
        .with_table("orders", frame(vec![int_col("Total$", &[5])]))
        .with_table("orders2", frame(vec![int_col("Total$", &[7])]));
    let options =
        BuildOptions::default().with_header_namespace(HeaderNamespaceMode::SharedWithFields);

    let report = DictionaryBuilder::new(options).build(&source).unwrap();

    let fields: Vec<&str> = report.dictionary.field_names().collect();
    let variables: Vec<&str> = report.dictionary.variable_names().collect();
    assert_eq!(fields, vec!["total__2", "total__1_1"]);
    assert_eq!(variables, vec!["total_", "total__1"]);
}

#[test]
fn repeated_header_names_are_suffixed_within_a_table() {
    // A reader has already made the frame names unique on its own terms.
    let source = MemorySource::new().with_raw_headers(
        "scores",
        vec!["a".to_string(), "a".to_string()],
        frame(vec![int_col("a", &[1]), int_col("a_duplicated_0", &[2])]),
    );

    let report = DictionaryBuilder::default().build(&source).unwrap();

    assert_eq!(source.column_names("scores"), vec!["a", "a_1"]);
    let variables: Vec<&str> = report.dictionary.variable_names().collect();
    let fields: Vec<&str> = report.dictionary.field_names().collect();
    assert_eq!(variables, vec!["a", "a_1"]);
    assert_eq!(fields, vec!["a", "a_1"]);
    assert_eq!(report.dictionary.records[1].validation_min, "2");
}

#[test]
fn header_and_frame_width_mismatch_is_skipped() {
    let source = MemorySource::new().with_raw_headers(
        "ragged",
        vec!["a".to_string()],
        frame(vec![int_col("a", &[1]), int_col("b", &[2])]),
    );

    let report = DictionaryBuilder::default().build(&source).unwrap();

    assert!(report.dictionary.is_empty());
    assert_eq!(report.skipped[0].stage, BuildStage::Describe);
    assert_eq!(report.skipped[0].reason, SkipReason::MalformedSource);
}

#[test]
fn records_follow_table_then_column_order() {
    let source = MemorySource::new()
        .with_table(
            "adverse_events",
            frame(vec![str_col("Term", &["rash"]), int_col("Grade", &[2])]),
        )
        .with_table("visits", frame(vec![int_col("Visit No", &[1, 2])]));

    let report = DictionaryBuilder::default().build(&source).unwrap();

    let rows: Vec<(&str, &str)> = report
        .dictionary
        .iter()
        .map(|r| (r.form_name.as_str(), r.variable_name.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Adverse events", "term"),
            ("Adverse events", "grade"),
            ("Visits", "visit_no"),
        ]
    );
    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.tables[1].rows, 2);
}

#[test]
fn column_types_drive_field_types() {
    let date = Series::new("Visit_Date".into(), &[19_737i32, 19_768])
        .cast(&DataType::Date)
        .unwrap()
        .into_column();
    let weight = Series::new("Weight".into(), &[70.5f64, 82.0]).into_column();
    let source = MemorySource::new().with_table(
        "patients",
        frame(vec![
            int_col("ID", &[3, 1]),
            weight,
            date,
            str_col("Site", &["A", "B"]),
        ]),
    );

    let report = DictionaryBuilder::default().build(&source).unwrap();
    let records = &report.dictionary.records;

    assert_eq!(records[0].validation, ValidationType::Integer);
    assert_eq!(records[0].validation_min, "1");
    assert_eq!(records[0].validation_max, "3");
    assert_eq!(records[1].validation, ValidationType::Number);
    assert!(!records[1].has_bounds());
    assert_eq!(records[2].field_type, FieldType::Date);
    assert_eq!(records[2].validation, ValidationType::Date);
    assert_eq!(records[3].field_type, FieldType::Text);
    assert_eq!(records[3].validation, ValidationType::None);
    assert!(records.iter().all(|r| r.required));
}

#[test]
fn empty_table_contributes_nothing() {
    let source = MemorySource::new()
        .with_table("blank", DataFrame::empty())
        .with_table("visits", frame(vec![int_col("Visit", &[1])]));

    let report = DictionaryBuilder::default().build(&source).unwrap();

    assert_eq!(report.dictionary.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].table.name, "blank");
    assert_eq!(report.skipped[0].stage, BuildStage::Describe);
    assert_eq!(report.skipped[0].reason, SkipReason::EmptySource);
    assert!(!report.has_errors());
}

#[test]
fn unreadable_table_is_skipped_and_run_continues() {
    let source = MemorySource::new()
        .with_unreadable("locked")
        .with_table("visits", frame(vec![int_col("Visit", &[1])]));

    let report = DictionaryBuilder::default().build(&source).unwrap();

    assert_eq!(report.dictionary.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].stage, BuildStage::Headers);
    assert_eq!(report.skipped[0].reason, SkipReason::UnreadableSource);
}

#[test]
fn empty_column_name_rejects_table_without_touching_others() {
    let source = MemorySource::new()
        .with_table("broken", frame(vec![int_col("Age", &[1]), int_col("", &[2])]))
        .with_table("patients", frame(vec![int_col("Age", &[40])]));

    let report = DictionaryBuilder::default().build(&source).unwrap();

    assert!(report.has_errors());
    assert_eq!(report.skipped[0].reason, SkipReason::InvalidIdentifierInput);
    // Nothing from the rejected table was registered, so "age" is still free.
    let fields: Vec<&str> = report.dictionary.field_names().collect();
    assert_eq!(fields, vec!["age"]);
    assert_eq!(source.column_names("broken"), vec!["Age", ""]);
}

#[test]
fn dry_run_leaves_sources_untouched() {
    let orders = || frame(vec![int_col("Total$", &[5]), int_col("2nd Item", &[1])]);
    let persisted = MemorySource::new().with_table("orders", orders());
    let dry = MemorySource::new().with_table("orders", orders());

    let persisted_report = DictionaryBuilder::default().build(&persisted).unwrap();
    let dry_report = DictionaryBuilder::new(BuildOptions::dry_run())
        .build(&dry)
        .unwrap();

    assert_eq!(dry_report.dictionary, persisted_report.dictionary);
    assert_eq!(*dry.writes.borrow(), 0);
    assert_eq!(dry.column_names("orders"), vec!["Total$", "2nd Item"]);
    assert_eq!(persisted.column_names("orders"), vec!["total_", "hdr_2nd_item"]);
    assert_eq!(
        dry_report.header_renames[0].renamed,
        vec!["total_".to_string(), "hdr_2nd_item".to_string()]
    );
}

#[test]
fn no_tables_yield_empty_dictionary() {
    let report = DictionaryBuilder::default()
        .build(&MemorySource::new())
        .unwrap();
    assert!(report.dictionary.is_empty());
    assert!(report.skipped.is_empty());
}
