//! End-to-end tests for the extract, transform and load stages.

use std::fs;
use std::path::Path;

use sales_cli::pipeline::{self, Stage, diagnose, run_pipeline};
use sales_ingest::TableStore;
use sales_model::{PipelineConfig, RejectReason};
use tempfile::TempDir;

const SALES_HEADER: &str =
    "invoice_id,date,time,customer_id,product_id,branch_id,payment,price,quantity,rating";

fn write_file(dir: &Path, name: &str, lines: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(dir.join(name), contents).unwrap();
}

/// Source tree with two Japan rows that survive adaptation (one of them on an
/// unknown branch) and a Myanmar invoice that appears twice.
fn source_tree() -> (TempDir, PipelineConfig) {
    let temp = TempDir::new().unwrap();
    let japan = temp.path().join("Source").join("japan_store");
    write_file(
        &japan,
        "sales_data.csv",
        &[
            SALES_HEADER,
            "J-1,1/5/2019,13:08,1,10,1,1,10000,2,9.1",
            "J-2,1/6/2019,10:29,1,10,1,1,10000,0,8",
            "J-3,1/7/2019,13:23,1,10,9,1,5000,1,7",
        ],
    );
    write_file(
        &japan,
        "japan_Customers.csv",
        &["id,name,membership,gender", "1,Aiko,member,female"],
    );
    write_file(
        &japan,
        "japan_items.csv",
        &["id,product_name,category", "10,green tea,food and beverages"],
    );
    write_file(&japan, "japan_branch.csv", &["id,name", "1,tokyo"]);
    write_file(&japan, "japan_payment.csv", &["id,name", "1,e-wallet"]);

    let myanmar = temp.path().join("Source").join("myanmar_store");
    write_file(
        &myanmar,
        "sales_data.csv",
        &[
            SALES_HEADER,
            "M-1,3/1/2019,12:00,1,5,1,2,12.5,4,",
            "M-1,3/1/2019,12:00,1,5,1,2,12.5,4,",
        ],
    );
    write_file(
        &myanmar,
        "myanmar_customers.csv",
        &["id,name,type,gender", "1,Aye,member,female"],
    );
    write_file(
        &myanmar,
        "myanmar_items.csv",
        &["id,name,type", "5,mohinga,food and beverages"],
    );
    write_file(&myanmar, "myanmar_branch.csv", &["id,name", "1,yangon"]);
    write_file(&myanmar, "myanmar_payment.csv", &["id,name", "2,cash"]);

    let config = PipelineConfig::default().with_data_dir(temp.path());
    (temp, config)
}

#[test]
fn stages_are_numbered_in_run_order() {
    let numbers: Vec<usize> = Stage::ALL.iter().map(|stage| stage.number()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(Stage::Transform.label(), "Transforming data");
}

#[test]
fn extract_copies_every_source_file() {
    let (_temp, config) = source_tree();
    let mut seen = Vec::new();
    let summary = pipeline::extract(&config, |table| seen.push(table.table.clone())).unwrap();

    assert_eq!(summary.tables.len(), 10);
    assert_eq!(seen.len(), 10);
    assert_eq!(seen[0], "japan_store_sales_data");
    assert_eq!(seen[5], "myanmar_store_sales_data");
    let rows: usize = summary.tables.iter().map(|table| table.rows).sum();
    assert_eq!(rows, 13);

    let tables = diagnose(&config).unwrap();
    assert_eq!(tables.len(), 10);
    let sales = tables
        .iter()
        .find(|table| table.name == "myanmar_store_sales_data")
        .unwrap();
    assert_eq!(sales.rows, 2);
    assert_eq!(sales.columns.len(), 10);
}

#[test]
fn full_run_writes_consolidated_table() {
    let (_temp, config) = source_tree();
    let result = run_pipeline(&config, &mut ()).unwrap();

    let japan = &result.transform.regions[0];
    assert_eq!(japan.region, "Japan");
    assert_eq!(japan.joined_rows, 3);
    assert_eq!(japan.rejected_for(RejectReason::NonPositiveQuantity), 1);
    assert_eq!(japan.output_rows(), 2);

    let myanmar = &result.transform.regions[1];
    assert_eq!(myanmar.output_rows(), 2);
    assert_eq!(myanmar.defaulted_cells.get("rating"), Some(&2));

    let report = &result.transform.consolidation;
    assert_eq!(report.input_rows, 4);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.incomplete_dropped, 1);
    assert_eq!(report.output_rows, 2);
    assert_eq!(result.load.rows, 2);

    let written = fs::read_to_string(&result.load.path).unwrap();
    insta::assert_snapshot!(written, @r"
    invoice_id,date,time,store,customer_id,customer_type,gender,product_id,product_name,category,price,quantity,branch_name,payment_method,rating
    J-1,1/5/2019,13:08,Japan,1,Member,Female,10,Green Tea,Food And Beverages,64,2,Tokyo,E-Wallet,9.1
    M-1,3/1/2019,12:00,Myanmar,1,Member,Female,5,Mohinga,Food And Beverages,12.5,4,Yangon,Cash,0
    ");
}

#[test]
fn load_copies_the_transformed_table_unchanged() {
    let (_temp, config) = source_tree();
    let result = run_pipeline(&config, &mut ()).unwrap();

    assert_eq!(result.transform.fingerprint, result.load.fingerprint);
    assert_eq!(result.transform.table, result.load.table);
    assert!(result.load.path.starts_with(config.presentation_dir()));
}

#[test]
fn rerunning_replaces_tables_with_identical_content() {
    let (_temp, config) = source_tree();
    let first = run_pipeline(&config, &mut ()).unwrap();
    let second = run_pipeline(&config, &mut ()).unwrap();

    assert_eq!(first.transform.fingerprint, second.transform.fingerprint);
    assert_eq!(first.load.fingerprint, second.load.fingerprint);
    assert_eq!(second.transform.consolidation.output_rows, 2);

    let presentation = TableStore::open(config.presentation_dir()).unwrap();
    assert_eq!(
        presentation.list_tables().unwrap(),
        vec![config.output_table.clone()]
    );
}

#[test]
fn transform_without_staging_tables_fails() {
    let (_temp, config) = source_tree();
    let error = pipeline::transform(&config).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("Japan"), "{message}");
    assert!(!config.transform_dir().join("all_sales_big_table.csv").exists());
}

#[test]
fn missing_source_file_aborts_extract() {
    let (temp, config) = source_tree();
    fs::remove_file(
        temp.path()
            .join("Source")
            .join("myanmar_store")
            .join("myanmar_payment.csv"),
    )
    .unwrap();

    assert!(run_pipeline(&config, &mut ()).is_err());
    // Tables written before the failure stay in staging.
    let staging = TableStore::open(config.staging_dir()).unwrap();
    assert!(staging.contains("japan_store_sales_data"));
    assert!(!config.presentation_dir().join("all_sales_big_table.csv").exists());
}
