//! Tests for the region adapter on small Japan and Myanmar tables.

use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use sales_model::{CanonicalField, RegionSpec, RejectReason};
use sales_transform::{CanonicalRecord, RegionAdapter, RegionInput, TransformError};

/// Build a text table; an empty string is a null cell.
fn table(columns: &[(&str, &[&str])]) -> DataFrame {
    let columns: Vec<Column> = columns
        .iter()
        .map(|(name, values)| {
            let cells: Vec<Option<&str>> = values
                .iter()
                .map(|value| if value.is_empty() { None } else { Some(*value) })
                .collect();
            Series::new((*name).into(), cells).into()
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

fn japan_input() -> RegionInput {
    RegionInput {
        sales: table(&[
            ("'invoice_id'", &["A1", "A2", "A3", "A4", "A5", "", "A7"]),
            ("date", &["1/5/2019", "1/6/2019", "1/7/2019", "1/8/2019", "1/9/2019", "", "2/1/2019"]),
            ("time", &["13:08", "10:29", "13:23", "20:33", "10:37", "", "11:00"]),
            ("customer_id", &["1", "1", "2", "99", "99", "", "2"]),
            ("product_id", &["10", "10", "11", "11", "10", "", "10"]),
            ("branch_id", &["1", "1", "1", "1", "99", "", "1"]),
            ("payment", &["1", "1", "1", "1", "1", "", "1"]),
            ("price", &["10000", "10000", "150000", "5000", "1234", "", "abc"]),
            ("quantity", &["2", "0", "1", "3", "1", "", "1"]),
            ("rating", &["9.1", "8", "7", "6.5", "5", "", "4"]),
        ]),
        customers: table(&[
            ("id", &["1", "1", "2"]),
            ("name", &["Aiko", "Aiko", "Ren"]),
            ("membership", &["member ", "member ", "normal"]),
            ("gender", &["female", "female", "male"]),
        ]),
        items: table(&[
            ("id", &["10", "11"]),
            ("product_name", &["green tea", "RICE CRACKERS"]),
            ("category", &["food and beverages", "food and beverages"]),
        ]),
        branches: table(&[("id", &["1"]), ("name", &["tokyo"])]),
        payments: table(&[("id", &["1"]), ("name", &["e-wallet"])]),
    }
}

fn myanmar_input() -> RegionInput {
    RegionInput {
        sales: table(&[
            ("invoice_id", &["M1", "M2"]),
            ("date", &["3/1/2019", "3/2/2019"]),
            ("time", &["12:00", "15:30"]),
            ("customer_id", &["1", "2"]),
            ("product_id", &["5", "5"]),
            ("branch_id", &["1", "1"]),
            ("payment", &["2", "2"]),
            ("price", &["12.5", "-3"]),
            ("quantity", &["4", "1"]),
            ("rating", &["", "6"]),
        ]),
        customers: table(&[
            ("id", &["1", "2"]),
            ("name", &["Aye", "Min"]),
            ("type", &["member", "normal"]),
            ("gender", &["female", "male"]),
        ]),
        items: table(&[
            ("id", &["5"]),
            ("name", &["mohinga"]),
            ("type", &["food and beverages"]),
        ]),
        branches: table(&[("id", &["1"]), ("name", &["yangon"])]),
        payments: table(&[("id", &["2"]), ("name", &["cash"])]),
    }
}

fn find<'a>(records: &'a [CanonicalRecord], invoice: &str) -> &'a CanonicalRecord {
    records
        .iter()
        .find(|record| record.invoice_id.as_deref() == Some(invoice))
        .unwrap()
}

#[test]
fn japan_rows_are_joined_converted_and_filtered() {
    let adapter = RegionAdapter::new(RegionSpec::japan());
    let output = adapter.run(&japan_input()).unwrap();
    let records = output.frame.records().unwrap();

    let invoices: Vec<&str> = records
        .iter()
        .filter_map(|record| record.invoice_id.as_deref())
        .collect();
    assert_eq!(invoices, vec!["A1", "A4", "A5"]);

    let a1 = find(&records, "A1");
    assert_eq!(a1.store, "Japan");
    assert_eq!(a1.price, 64.0);
    assert_eq!(a1.quantity, 2.0);
    assert_eq!(a1.rating, 9.1);
    assert_eq!(a1.customer_type, "Member");
    assert_eq!(a1.gender, "Female");
    assert_eq!(a1.product_name, "Green Tea");
    assert_eq!(a1.category, "Food And Beverages");
    assert_eq!(a1.branch_name.as_deref(), Some("Tokyo"));
    assert_eq!(a1.payment_method, "E-Wallet");
    assert_eq!(a1.date, "1/5/2019");

    assert_eq!(find(&records, "A4").price, 32.0);
    assert_eq!(find(&records, "A5").price, 7.9);
}

#[test]
fn customer_miss_defaults_to_unknown() {
    let adapter = RegionAdapter::new(RegionSpec::japan());
    let records = adapter.run(&japan_input()).unwrap().frame.records().unwrap();

    let a4 = find(&records, "A4");
    assert_eq!(a4.customer_type, "Unknown");
    assert_eq!(a4.gender, "Unknown");
    assert_eq!(a4.branch_name.as_deref(), Some("Tokyo"));

    let a5 = find(&records, "A5");
    assert_eq!(a5.customer_type, "Unknown");
    assert_eq!(a5.branch_name, None);
    assert_eq!(a5.product_name, "Green Tea");
}

#[test]
fn japan_quality_report_counts_every_joined_row() {
    let adapter = RegionAdapter::new(RegionSpec::japan());
    let quality = adapter.run(&japan_input()).unwrap().quality;

    assert_eq!(quality.region, "Japan");
    assert_eq!(quality.joined_rows, 7);
    assert_eq!(quality.valid, 1);
    assert_eq!(quality.defaulted, 2);
    assert_eq!(quality.rejected_for(RejectReason::EmptyRow), 1);
    assert_eq!(quality.rejected_for(RejectReason::SanityThreshold), 1);
    assert_eq!(quality.rejected_for(RejectReason::NonPositiveQuantity), 1);
    assert_eq!(quality.rejected_for(RejectReason::NonPositivePrice), 1);
    assert_eq!(
        quality.output_rows() + quality.rejected_total(),
        quality.joined_rows
    );
    assert_eq!(quality.defaulted_cells.get("customer_type"), Some(&2));
    assert_eq!(quality.defaulted_cells.get("branch_name"), None);
}

#[test]
fn zero_quantity_row_is_joined_but_not_adapted() {
    let adapter = RegionAdapter::new(RegionSpec::japan());
    let input = japan_input();

    let joined = adapter.join(&input).unwrap();
    let invoices = joined.column("invoice_id").unwrap().str().unwrap();
    assert!(invoices.into_iter().any(|invoice| invoice == Some("A2")));

    let records = adapter.run(&input).unwrap().frame.records().unwrap();
    assert!(records.iter().all(|record| record.invoice_id.as_deref() != Some("A2")));
}

#[test]
fn distinct_dimensions_do_not_repeat_fact_rows() {
    let japan = RegionAdapter::new(RegionSpec::japan());
    assert_eq!(japan.join(&japan_input()).unwrap().height(), 7);

    let mut spec = RegionSpec::japan();
    spec.distinct_dimensions = false;
    let repeated = RegionAdapter::new(spec).join(&japan_input()).unwrap();
    // A1 and A2 each match the duplicated customer row twice.
    assert_eq!(repeated.height(), 9);
}

#[test]
fn output_is_projected_in_canonical_order() {
    let adapter = RegionAdapter::new(RegionSpec::myanmar());
    let output = adapter.run(&myanmar_input()).unwrap();

    let names: Vec<String> = output
        .frame
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, CanonicalField::column_names());
    assert_eq!(
        output.frame.data.column("quantity").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(output.frame.origin, "Myanmar");
}

#[test]
fn myanmar_resolves_suffixed_item_columns() {
    let adapter = RegionAdapter::new(RegionSpec::myanmar());
    let output = adapter.run(&myanmar_input()).unwrap();
    let records = output.frame.records().unwrap();

    assert_eq!(records.len(), 1);
    let m1 = &records[0];
    assert_eq!(m1.store, "Myanmar");
    assert_eq!(m1.customer_type, "Member");
    assert_eq!(m1.product_name, "Mohinga");
    assert_eq!(m1.category, "Food And Beverages");
    assert_eq!(m1.branch_name.as_deref(), Some("Yangon"));
    assert_eq!(m1.payment_method, "Cash");
    assert_eq!(m1.price, 12.5);
    assert_eq!(m1.rating, 0.0);

    assert_eq!(output.quality.defaulted, 1);
    assert_eq!(output.quality.defaulted_cells.get("rating"), Some(&1));
    assert_eq!(
        output.quality.rejected_for(RejectReason::NonPositivePrice),
        1
    );
}

#[test]
fn unresolved_canonical_field_is_fatal() {
    let mut input = myanmar_input();
    input.items = table(&[("id", &["5"]), ("name", &["mohinga"])]);

    let adapter = RegionAdapter::new(RegionSpec::myanmar());
    let err = adapter.run(&input).unwrap_err();
    assert!(matches!(
        err,
        TransformError::UnresolvedField {
            field: CanonicalField::Category,
            ..
        }
    ));
}

#[test]
fn missing_foreign_key_is_fatal() {
    let mut input = japan_input();
    input.sales = table(&[("invoice_id", &["A1"]), ("customer_id", &["1"])]);

    let adapter = RegionAdapter::new(RegionSpec::japan());
    let err = adapter.run(&input).unwrap_err();
    assert!(matches!(
        err,
        TransformError::MissingColumn { ref column, .. } if column == "product_id"
    ));
}

fn myanmar_single_sale(price: &str) -> RegionInput {
    let mut input = myanmar_input();
    input.sales = table(&[
        ("invoice_id", &["M9"]),
        ("date", &["3/3/2019"]),
        ("time", &["09:15"]),
        ("customer_id", &["1"]),
        ("product_id", &["5"]),
        ("branch_id", &["1"]),
        ("payment", &["2"]),
        ("price", &[price]),
        ("quantity", &["1"]),
        ("rating", &["7"]),
    ]);
    input
}

#[test]
fn huge_price_without_conversion_stays_finite() {
    let adapter = RegionAdapter::new(RegionSpec::myanmar());
    let output = adapter.run(&myanmar_single_sale("1e307")).unwrap();
    let records = output.frame.records().unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].price.is_finite());
    assert_eq!(records[0].price, 1e307);
    assert_eq!(output.quality.valid, 1);
}

#[test]
fn overflowing_conversion_rejects_the_row() {
    let mut spec = RegionSpec::myanmar();
    spec.currency.rate = 100.0;
    let adapter = RegionAdapter::new(spec);
    let output = adapter.run(&myanmar_single_sale("1e307")).unwrap();

    assert_eq!(output.frame.record_count(), 0);
    assert_eq!(output.quality.rejected_for(RejectReason::NonFinitePrice), 1);
    assert_eq!(output.quality.output_rows(), 0);
}
