use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sales_cli::types::{ExtractSummary, LoadSummary, RunResult, TransformSummary};
use sales_common::format_numeric;
use sales_ingest::TableDescription;
use sales_model::{ConsolidationReport, PipelineConfig, QualityReport, RejectReason};

pub fn print_run_summary(result: &RunResult) {
    print_extract_summary(&result.extract);
    print_transform_summary(&result.transform);
    print_load_summary(&result.load);
}

pub fn print_extract_summary(summary: &ExtractSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Table"),
        header_cell("Source"),
        header_cell("Rows"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_rows = 0usize;
    for extracted in &summary.tables {
        total_rows += extracted.rows;
        table.add_row(vec![
            region_cell(&extracted.region),
            Cell::new(&extracted.table),
            dim_cell(extracted.source.display()),
            Cell::new(extracted.rows),
        ]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        total_cell(format!("{} tables", summary.tables.len())),
        dim_cell(format!("{} ms", summary.duration_ms)),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
    ]);
    println!("Extracted:");
    println!("{table}");
}

pub fn print_transform_summary(summary: &TransformSummary) {
    print_quality_table(&summary.regions);
    print_consolidation_table(&summary.consolidation);
    println!("Output: {} ({})", summary.table, summary.path.display());
    println!("SHA-256: {}", summary.fingerprint);
}

pub fn print_load_summary(summary: &LoadSummary) {
    println!(
        "Loaded {} rows into {} ({})",
        summary.rows,
        summary.table,
        summary.path.display()
    );
    println!("SHA-256: {}", summary.fingerprint);
}

fn print_quality_table(reports: &[QualityReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Joined"),
        header_cell("Valid"),
        header_cell("Defaulted"),
        header_cell("Empty"),
        header_cell("Over threshold"),
        header_cell("Quantity <= 0"),
        header_cell("Price <= 0"),
        header_cell("Price not finite"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..10 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for report in reports {
        table.add_row(vec![
            region_cell(&report.region),
            Cell::new(report.joined_rows),
            Cell::new(report.valid),
            count_cell(report.defaulted, Color::Yellow),
            count_cell(report.rejected_for(RejectReason::EmptyRow), Color::Red),
            count_cell(report.rejected_for(RejectReason::SanityThreshold), Color::Red),
            count_cell(
                report.rejected_for(RejectReason::NonPositiveQuantity),
                Color::Red,
            ),
            count_cell(report.rejected_for(RejectReason::NonPositivePrice), Color::Red),
            count_cell(report.rejected_for(RejectReason::NonFinitePrice), Color::Red),
            Cell::new(report.output_rows()).add_attribute(Attribute::Bold),
        ]);
    }
    println!("Regions:");
    println!("{table}");

    let defaulted: Vec<String> = reports
        .iter()
        .flat_map(|report| {
            report
                .defaulted_cells
                .iter()
                .map(move |(field, count)| format!("{}.{field}: {count}", report.region))
        })
        .collect();
    if !defaulted.is_empty() {
        println!("Defaulted cells: {}", defaulted.join(", "));
    }
}

fn print_consolidation_table(report: &ConsolidationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input rows"),
        header_cell("Duplicates"),
        header_cell("Incomplete"),
        header_cell("Output rows"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.input_rows),
        count_cell(report.duplicates_dropped, Color::Yellow),
        count_cell(report.incomplete_dropped, Color::Yellow),
        Cell::new(report.output_rows).add_attribute(Attribute::Bold),
    ]);
    println!("Consolidation:");
    println!("{table}");
}

pub fn print_diagnostics(store: &Path, tables: &[TableDescription]) {
    println!("Staging: {}", store.display());
    if tables.is_empty() {
        println!("No tables found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for description in tables {
        table.add_row(vec![
            Cell::new(&description.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(description.rows),
            Cell::new(description.columns.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_regions(config: &PipelineConfig) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Sales table"),
        header_cell("Rate"),
        header_cell("Sanity threshold"),
        header_cell("Distinct dimensions"),
        header_cell("Renames"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for region in &config.regions {
        let renames: Vec<String> = region
            .renames
            .iter()
            .map(|rename| format!("{} -> {}", rename.from, rename.to))
            .collect();
        table.add_row(vec![
            region_cell(&region.name),
            Cell::new(&region.tables.sales),
            Cell::new(format_numeric(region.currency.rate)),
            match region.currency.sanity_threshold {
                Some(threshold) => Cell::new(format_numeric(threshold)),
                None => dim_cell("-"),
            },
            if region.distinct_dimensions {
                Cell::new("yes").fg(Color::Green)
            } else {
                dim_cell("no")
            },
            Cell::new(renames.join(", ")),
        ]);
    }
    println!("Output table: {}", config.output_table);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn region_cell(region: &str) -> Cell {
    Cell::new(region)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn total_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
