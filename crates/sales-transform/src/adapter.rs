//! Region adapter: five raw region tables in, canonical records out.
//!
//! One [`RegionAdapter`] type serves every region; what differs between
//! regions lives in its [`RegionSpec`]. A run goes through these steps:
//!
//! 1. clean the headers of every raw table (and collapse duplicate dimension
//!    rows when the region asks for it),
//! 2. left-join the dimensions onto the sales facts in configured order,
//! 3. apply the rename map and drop the configured columns,
//! 4. resolve every canonical field to a column,
//! 5. classify each joined row: empty rows, the currency sanity threshold,
//!    non-positive quantity and a non-positive or overflowing converted
//!    price reject it; otherwise it is kept as valid or defaulted,
//! 6. project kept rows onto the canonical schema with the store tag.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use sales_common::{clean_column_names, coerce_measure, round_to_cents};
use sales_model::{
    CANONICAL_FIELDS, CanonicalField, Dimension, FieldKind, QualityReport, RegionSpec,
    RegionTables, RejectReason, RowQuality,
};

use crate::clean::{apply_renames, distinct_rows, drop_columns, empty_rows, fill_text};
use crate::data_utils::named_column_cells;
use crate::error::{Result, TransformError};
use crate::frame::{CanonicalRecord, SalesFrame};
use crate::join::left_join;

/// The five raw tables of one region.
#[derive(Debug, Clone)]
pub struct RegionInput {
    pub sales: DataFrame,
    pub customers: DataFrame,
    pub items: DataFrame,
    pub branches: DataFrame,
    pub payments: DataFrame,
}

impl RegionInput {
    /// Read the region's tables through `read`, fact table first.
    pub fn load<E, F>(tables: &RegionTables, mut read: F) -> std::result::Result<Self, E>
    where
        F: FnMut(&str) -> std::result::Result<DataFrame, E>,
    {
        Ok(Self {
            sales: read(&tables.sales)?,
            customers: read(&tables.customers)?,
            items: read(&tables.items)?,
            branches: read(&tables.branches)?,
            payments: read(&tables.payments)?,
        })
    }

    pub fn dimension(&self, dimension: Dimension) -> &DataFrame {
        match dimension {
            Dimension::Customer => &self.customers,
            Dimension::Item => &self.items,
            Dimension::Branch => &self.branches,
            Dimension::Payment => &self.payments,
        }
    }
}

/// Canonical records of one region plus the quality of the rows behind them.
#[derive(Debug, Clone)]
pub struct RegionOutput {
    pub frame: SalesFrame,
    pub quality: QualityReport,
}

/// Canonical field cells resolved from the joined table.
struct ResolvedColumns {
    cells: BTreeMap<CanonicalField, Vec<Option<String>>>,
}

impl ResolvedColumns {
    fn cell(&self, field: CanonicalField, idx: usize) -> Option<&str> {
        self.cells
            .get(&field)
            .and_then(|column| column.get(idx))
            .and_then(|cell| cell.as_deref())
    }
}

/// A kept row and the fields the missing-value policy filled in.
struct KeptRow {
    record: CanonicalRecord,
    defaulted: Vec<CanonicalField>,
}

/// Adapts one region's raw tables to the canonical schema.
#[derive(Debug, Clone)]
pub struct RegionAdapter {
    spec: RegionSpec,
}

impl RegionAdapter {
    pub fn new(spec: RegionSpec) -> Self {
        Self { spec }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &RegionSpec {
        &self.spec
    }

    /// Clean the raw tables and join every dimension onto the facts.
    ///
    /// The result still has raw and suffixed column names.
    pub fn join(&self, input: &RegionInput) -> Result<DataFrame> {
        let mut joined = clean_column_names(&input.sales)?;
        for join in &self.spec.joins {
            let mut dimension = clean_column_names(input.dimension(join.dimension))?;
            if self.spec.distinct_dimensions {
                dimension = distinct_rows(&dimension)?;
            }
            joined = left_join(&self.spec.name, &joined, &dimension, join)?;
            debug!(
                region = %self.spec.name,
                dimension = join.dimension.as_str(),
                rows = joined.height(),
                "dimension joined"
            );
        }
        Ok(joined)
    }

    /// Run the full adapter on one region's raw tables.
    pub fn run(&self, input: &RegionInput) -> Result<RegionOutput> {
        let span = info_span!("region", region = %self.spec.name);
        let _guard = span.enter();

        let joined = self.join(input)?;
        let renamed = apply_renames(&self.spec.name, &joined, &self.spec.renames)?;
        let shaped = drop_columns(&renamed, &self.spec.drop_columns)?;
        let columns = self.resolve(&shaped)?;
        let empty = empty_rows(&shaped)?;

        let mut quality = QualityReport::new(self.spec.name.clone());
        quality.joined_rows = shaped.height();
        let mut records = Vec::with_capacity(shaped.height());
        for (idx, is_empty) in empty.into_iter().enumerate() {
            let outcome = if is_empty {
                Err(RejectReason::EmptyRow)
            } else {
                self.adapt_row(&columns, idx)
            };
            match outcome {
                Ok(row) => {
                    quality.record(if row.defaulted.is_empty() {
                        RowQuality::Valid
                    } else {
                        RowQuality::Defaulted
                    });
                    for field in &row.defaulted {
                        quality.record_default(field.as_str());
                    }
                    records.push(row.record);
                }
                Err(reason) => quality.record(RowQuality::Rejected(reason)),
            }
        }

        let frame = SalesFrame::from_records(self.spec.name.clone(), &records)?;
        info!(
            joined_rows = quality.joined_rows,
            row_count = frame.record_count(),
            defaulted = quality.defaulted,
            rejected = quality.rejected_total(),
            "region adapted"
        );
        for (reason, count) in &quality.rejected {
            debug!(reason = %reason, count, "rows rejected");
        }
        Ok(RegionOutput { frame, quality })
    }

    /// Map every canonical field except the store tag to a joined column.
    fn resolve(&self, df: &DataFrame) -> Result<ResolvedColumns> {
        let mut cells = BTreeMap::new();
        for field in CANONICAL_FIELDS {
            if field.kind() == FieldKind::Tag {
                continue;
            }
            let column = named_column_cells(df, field.as_str())?.ok_or_else(|| {
                TransformError::UnresolvedField {
                    region: self.spec.name.clone(),
                    field,
                }
            })?;
            cells.insert(field, column);
        }
        Ok(ResolvedColumns { cells })
    }

    fn adapt_row(
        &self,
        columns: &ResolvedColumns,
        idx: usize,
    ) -> std::result::Result<KeptRow, RejectReason> {
        let mut defaulted = Vec::new();
        let mut measure = |field: CanonicalField| {
            let (value, filled) = coerce_measure(columns.cell(field, idx));
            if filled {
                defaulted.push(field);
            }
            value
        };

        let raw_price = measure(CanonicalField::Price);
        if let Some(threshold) = self.spec.currency.sanity_threshold
            && raw_price >= threshold
        {
            return Err(RejectReason::SanityThreshold);
        }
        let quantity = measure(CanonicalField::Quantity);
        if quantity <= 0.0 {
            return Err(RejectReason::NonPositiveQuantity);
        }
        let price = round_to_cents(raw_price * self.spec.currency.rate);
        if !price.is_finite() {
            return Err(RejectReason::NonFinitePrice);
        }
        if price <= 0.0 {
            return Err(RejectReason::NonPositivePrice);
        }
        let rating = measure(CanonicalField::Rating);

        let mut text = |field: CanonicalField| {
            let (value, filled) = fill_text(field.kind(), columns.cell(field, idx));
            if filled {
                defaulted.push(field);
            }
            value
        };
        let record = CanonicalRecord {
            invoice_id: text(CanonicalField::InvoiceId),
            date: text(CanonicalField::Date).unwrap_or_default(),
            time: text(CanonicalField::Time).unwrap_or_default(),
            store: self.spec.name.clone(),
            customer_id: text(CanonicalField::CustomerId),
            customer_type: text(CanonicalField::CustomerType).unwrap_or_default(),
            gender: text(CanonicalField::Gender).unwrap_or_default(),
            product_id: text(CanonicalField::ProductId),
            product_name: text(CanonicalField::ProductName).unwrap_or_default(),
            category: text(CanonicalField::Category).unwrap_or_default(),
            price,
            quantity,
            branch_name: text(CanonicalField::BranchName),
            payment_method: text(CanonicalField::PaymentMethod).unwrap_or_default(),
            rating,
        };
        Ok(KeptRow { record, defaulted })
    }
}
