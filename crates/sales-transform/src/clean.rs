//! Table cleaning steps applied around the region joins.
//!
//! Header cleaning and distinct-row collapsing run on raw tables before the
//! joins; renames, column drops and the missing-value policy run on the
//! joined table.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};

use sales_common::{normalize_key, title_case};
use sales_model::{ColumnRename, FieldKind};

use crate::data_utils::{column_cells, has_column, is_blank};
use crate::error::{Result, TransformError};

/// Collapse exact-duplicate rows, keeping the first occurrence.
pub fn distinct_rows(df: &DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let mut cells = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        cells.push(column_cells(column)?);
    }
    let mut seen = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row: Vec<Option<&str>> = cells
            .iter()
            .map(|column| column[idx].as_deref())
            .collect();
        keep.push(seen.insert(row));
    }
    let mask = BooleanChunked::from_slice("distinct".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Rows whose every cell is null or blank.
pub fn empty_rows(df: &DataFrame) -> Result<Vec<bool>> {
    let mut empty = vec![true; df.height()];
    for column in df.get_columns() {
        for (idx, value) in column_cells(column)?.iter().enumerate() {
            if !is_blank(value.as_deref()) {
                empty[idx] = false;
            }
        }
    }
    Ok(empty)
}

/// Apply renames in order.
///
/// A rename whose source column is absent is skipped; the projection reports
/// any canonical field left unresolved. Renaming onto an existing column is a
/// collision.
pub fn apply_renames(region: &str, df: &DataFrame, renames: &[ColumnRename]) -> Result<DataFrame> {
    let mut names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for rename in renames {
        let Some(pos) = names.iter().position(|name| *name == rename.from) else {
            continue;
        };
        if rename.from != rename.to && names.contains(&rename.to) {
            return Err(TransformError::ColumnCollision {
                region: region.to_string(),
                column: rename.to.clone(),
                stage: "rename",
            });
        }
        names[pos] = rename.to.clone();
    }
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(&names)
        .map(|(column, name)| {
            let mut column = column.clone();
            column.rename(name.as_str().into());
            column
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Remove the named columns; names that are not present are ignored.
pub fn drop_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    if !names.iter().any(|name| has_column(df, name)) {
        return Ok(df.clone());
    }
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|column| !names.iter().any(|name| name == column.name().as_str()))
        .cloned()
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Apply the missing-value policy and string normalization to a text cell.
///
/// Returns the value and whether it was filled by the policy. Present values
/// are trimmed; keys lose an integral fractional part and title-cased kinds
/// are title-cased. Missing values get the kind's default fill, or stay
/// `None` for kinds that are never defaulted.
pub fn fill_text(kind: FieldKind, raw: Option<&str>) -> (Option<String>, bool) {
    if let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) {
        let normalized = match kind {
            FieldKind::Key => normalize_key(value).unwrap_or_else(|| value.to_string()),
            _ if kind.is_title_cased() => title_case(value),
            _ => value.to_string(),
        };
        return (Some(normalized), false);
    }
    match kind.default_fill() {
        Some(fill) => (Some(fill.to_string()), true),
        None => (None, false),
    }
}
