use std::collections::BTreeSet;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use redcap_cli::pipeline::{BuildResult, DuplicatesResult};
use redcap_dictionary::{BuildStage, SkipReason, SkippedTable};
use redcap_model::SuspectPair;

pub fn print_build_summary(result: &BuildResult) {
    println!("Source: {}", result.source_dir.display());
    match &result.output_path {
        Some(path) => println!("Dictionary: {}", path.display()),
        None => println!("Dictionary: - (dry run, nothing written)"),
    }
    if let Some(path) = &result.report_path {
        println!("Build report: {}", path.display());
    }
    let report = &result.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Form"),
        header_cell("Source"),
        header_cell("Rows"),
        header_cell("Fields"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_rows = 0usize;
    let mut total_fields = 0usize;
    for summary in &report.tables {
        total_rows += summary.rows;
        total_fields += summary.fields;
        table.add_row(vec![
            Cell::new(&summary.form_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.table.file_name),
            Cell::new(summary.rows),
            Cell::new(summary.fields),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} tables", report.tables.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(total_fields).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_skipped_table(&report.skipped);
    if let Some(pairs) = &result.suspects {
        print_suspect_table(pairs);
    }
    if result.has_errors {
        eprintln!("Errors:");
        for skipped in report
            .skipped
            .iter()
            .filter(|s| s.reason == SkipReason::InvalidIdentifierInput)
        {
            eprintln!("- {}: {}", skipped.table.file_name, skipped.message);
        }
    }
}

pub fn print_duplicates(result: &DuplicatesResult) {
    println!("Dictionary: {}", result.dictionary_path.display());
    println!("Variables: {}", result.variables);
    if result.suspect_names.is_empty() {
        println!("No zero-suffixed variable names.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Zero-suffixed variable")]);
    apply_table_style(&mut table);
    for name in &result.suspect_names {
        table.add_row(vec![Cell::new(name)]);
    }
    println!("{table}");
    print_suspect_table(&result.pairs);
}

fn print_skipped_table(skipped: &[SkippedTable]) {
    if skipped.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Stage"),
        header_cell("Reason"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for entry in skipped {
        table.add_row(vec![
            Cell::new(&entry.table.file_name),
            dim_cell(stage_label(entry.stage)),
            reason_cell(entry.reason),
            Cell::new(&entry.message),
        ]);
    }
    println!();
    println!("Skipped:");
    println!("{table}");
}

fn print_suspect_table(pairs: &BTreeSet<SuspectPair>) {
    println!();
    if pairs.is_empty() {
        println!("Possible duplicates: none");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Variable"), header_cell("Collides with")]);
    apply_table_style(&mut table);
    for pair in pairs {
        table.add_row(vec![
            Cell::new(&pair.name).fg(Color::Yellow),
            Cell::new(&pair.canonical),
        ]);
    }
    println!("Possible duplicates:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn stage_label(stage: BuildStage) -> &'static str {
    match stage {
        BuildStage::Headers => "headers",
        BuildStage::Describe => "describe",
    }
}

fn reason_cell(reason: SkipReason) -> Cell {
    match reason {
        SkipReason::InvalidIdentifierInput => Cell::new(reason.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        _ => Cell::new(reason.as_str()).fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
