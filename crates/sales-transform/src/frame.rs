//! Canonical sales frames.
//!
//! [`SalesFrame`] wraps a Polars DataFrame holding canonical sales records
//! together with the label of what produced it: a region name for adapter
//! output, `"all"` for the consolidated table.
//!
//! The canonical frame always has the fifteen [`CANONICAL_FIELDS`] in order.
//! Measures (price, quantity, rating) are `Float64` columns, everything else
//! is a `String` column.

use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};

use sales_common::any_to_f64;
use sales_model::{CANONICAL_FIELDS, CanonicalField, FieldKind};

use crate::data_utils::cell_text;
use crate::error::Result;

/// Origin label of the consolidated frame.
pub const CONSOLIDATED_ORIGIN: &str = "all";

/// One canonical sales record.
///
/// Key fields and `branch_name` stay optional because a failed join leaves
/// them empty until consolidation drops the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    pub invoice_id: Option<String>,
    pub date: String,
    pub time: String,
    pub store: String,
    pub customer_id: Option<String>,
    pub customer_type: String,
    pub gender: String,
    pub product_id: Option<String>,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
    pub branch_name: Option<String>,
    pub payment_method: String,
    pub rating: f64,
}

impl CanonicalRecord {
    /// Text value of a non-measure field.
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::InvoiceId => self.invoice_id.as_deref(),
            CanonicalField::Date => Some(&self.date),
            CanonicalField::Time => Some(&self.time),
            CanonicalField::Store => Some(&self.store),
            CanonicalField::CustomerId => self.customer_id.as_deref(),
            CanonicalField::CustomerType => Some(&self.customer_type),
            CanonicalField::Gender => Some(&self.gender),
            CanonicalField::ProductId => self.product_id.as_deref(),
            CanonicalField::ProductName => Some(&self.product_name),
            CanonicalField::Category => Some(&self.category),
            CanonicalField::BranchName => self.branch_name.as_deref(),
            CanonicalField::PaymentMethod => Some(&self.payment_method),
            CanonicalField::Price | CanonicalField::Quantity | CanonicalField::Rating => None,
        }
    }

    /// Value of a measure field.
    pub fn measure(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::Price => Some(self.price),
            CanonicalField::Quantity => Some(self.quantity),
            CanonicalField::Rating => Some(self.rating),
            _ => None,
        }
    }

    fn set_text(&mut self, field: CanonicalField, value: Option<String>) {
        let slot = match field {
            CanonicalField::InvoiceId => &mut self.invoice_id,
            CanonicalField::CustomerId => &mut self.customer_id,
            CanonicalField::ProductId => &mut self.product_id,
            CanonicalField::BranchName => &mut self.branch_name,
            _ => {
                if let Some(text) = self.text_mut(field) {
                    *text = value.unwrap_or_default();
                }
                return;
            }
        };
        *slot = value;
    }

    fn text_mut(&mut self, field: CanonicalField) -> Option<&mut String> {
        match field {
            CanonicalField::Date => Some(&mut self.date),
            CanonicalField::Time => Some(&mut self.time),
            CanonicalField::Store => Some(&mut self.store),
            CanonicalField::CustomerType => Some(&mut self.customer_type),
            CanonicalField::Gender => Some(&mut self.gender),
            CanonicalField::ProductName => Some(&mut self.product_name),
            CanonicalField::Category => Some(&mut self.category),
            CanonicalField::PaymentMethod => Some(&mut self.payment_method),
            _ => None,
        }
    }

    fn set_measure(&mut self, field: CanonicalField, value: f64) {
        match field {
            CanonicalField::Price => self.price = value,
            CanonicalField::Quantity => self.quantity = value,
            CanonicalField::Rating => self.rating = value,
            _ => {}
        }
    }
}

/// A canonical sales table with its origin label.
#[derive(Debug, Clone)]
pub struct SalesFrame {
    /// Region name, or [`CONSOLIDATED_ORIGIN`].
    pub origin: String,
    pub data: DataFrame,
}

impl SalesFrame {
    pub fn new(origin: impl Into<String>, data: DataFrame) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }

    /// Build a frame from records, columns in canonical order.
    pub fn from_records(origin: impl Into<String>, records: &[CanonicalRecord]) -> Result<Self> {
        Ok(Self::new(origin, build_canonical_frame(records)?))
    }

    /// A frame with the canonical columns and no rows.
    pub fn empty(origin: impl Into<String>) -> Result<Self> {
        Self::from_records(origin, &[])
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Read the frame back into records.
    ///
    /// Columns that are absent read as empty values.
    pub fn records(&self) -> Result<Vec<CanonicalRecord>> {
        let mut records = vec![CanonicalRecord::default(); self.data.height()];
        for field in CANONICAL_FIELDS {
            let Ok(column) = self.data.column(field.as_str()) else {
                continue;
            };
            for (idx, record) in records.iter_mut().enumerate() {
                let value = column.get(idx)?;
                if field.kind() == FieldKind::Measure {
                    record.set_measure(field, any_to_f64(value).unwrap_or(0.0));
                } else {
                    record.set_text(field, cell_text(value));
                }
            }
        }
        Ok(records)
    }
}

/// Build the canonical DataFrame for a slice of records.
pub fn build_canonical_frame(records: &[CanonicalRecord]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(CANONICAL_FIELDS.len());
    for field in CANONICAL_FIELDS {
        let name = PlSmallStr::from(field.as_str());
        let series = if field.kind() == FieldKind::Measure {
            let values: Vec<f64> = records
                .iter()
                .map(|record| record.measure(field).unwrap_or(0.0))
                .collect();
            Series::new(name, values)
        } else {
            let values: Vec<Option<&str>> =
                records.iter().map(|record| record.text(field)).collect();
            Series::new(name, values)
        };
        columns.push(series.into());
    }
    Ok(DataFrame::new(columns)?)
}
