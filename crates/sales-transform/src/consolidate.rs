//! Cross-region consolidation.
//!
//! Region frames are stacked in registration order, duplicate facts are
//! dropped by business key (first occurrence wins, nulls equal to nulls),
//! then rows missing a required field are dropped.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{info, info_span};

use sales_model::{CanonicalField, ConsolidationReport, DEDUP_KEY, REQUIRED_FIELDS};

use crate::data_utils::{column_cells, has_column, is_blank};
use crate::error::{Result, TransformError};
use crate::frame::{CONSOLIDATED_ORIGIN, SalesFrame};

/// The consolidated table and how it was reached.
#[derive(Debug, Clone)]
pub struct Consolidated {
    pub frame: SalesFrame,
    pub report: ConsolidationReport,
}

#[derive(Debug, Clone, Default)]
pub struct Consolidator;

impl Consolidator {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate, deduplicate and filter region frames.
    pub fn consolidate(&self, frames: &[SalesFrame]) -> Result<Consolidated> {
        let span = info_span!("consolidate", regions = frames.len());
        let _guard = span.enter();

        let mut data = concat_frames(frames)?;
        let input_rows = data.height();

        let unique = first_occurrence_mask(&data, &DEDUP_KEY)?;
        let duplicates_dropped = unique.iter().filter(|keep| !**keep).count();
        data = data.filter(&BooleanChunked::from_slice("unique".into(), &unique))?;

        let complete = completeness_mask(&data, &REQUIRED_FIELDS)?;
        let incomplete_dropped = complete.iter().filter(|keep| !**keep).count();
        data = data.filter(&BooleanChunked::from_slice("complete".into(), &complete))?;

        let report = ConsolidationReport {
            input_rows,
            duplicates_dropped,
            incomplete_dropped,
            output_rows: data.height(),
        };
        info!(
            input_rows,
            duplicates_dropped,
            incomplete_dropped,
            row_count = report.output_rows,
            "rows after cleaning"
        );
        Ok(Consolidated {
            frame: SalesFrame::new(CONSOLIDATED_ORIGIN, data),
            report,
        })
    }
}

/// Stack frames in order onto the canonical column layout.
pub fn concat_frames(frames: &[SalesFrame]) -> Result<DataFrame> {
    let mut combined = SalesFrame::empty(CONSOLIDATED_ORIGIN)?.data;
    let names = CanonicalField::column_names();
    for frame in frames {
        if let Some(missing) = names.iter().find(|name| !has_column(&frame.data, name)) {
            return Err(TransformError::MissingColumn {
                region: frame.origin.clone(),
                column: (*missing).to_string(),
                stage: "consolidate",
            });
        }
        let projected = frame.data.select(names.iter().copied())?;
        combined.vstack_mut(&projected)?;
    }
    Ok(combined)
}

/// `true` for the first row of every distinct key tuple.
pub fn first_occurrence_mask(df: &DataFrame, key: &[CanonicalField]) -> Result<Vec<bool>> {
    let mut columns = Vec::with_capacity(key.len());
    for field in key {
        columns.push(column_cells(df.column(field.as_str())?)?);
    }
    let mut seen = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let tuple: Vec<Option<&str>> = columns
            .iter()
            .map(|column| column[idx].as_deref())
            .collect();
        keep.push(seen.insert(tuple));
    }
    Ok(keep)
}

/// `true` for rows where every listed field is present and not blank.
pub fn completeness_mask(df: &DataFrame, fields: &[CanonicalField]) -> Result<Vec<bool>> {
    let mut keep = vec![true; df.height()];
    for field in fields {
        let cells = column_cells(df.column(field.as_str())?)?;
        for (idx, cell) in cells.iter().enumerate() {
            if is_blank(cell.as_deref()) {
                keep[idx] = false;
            }
        }
    }
    Ok(keep)
}
