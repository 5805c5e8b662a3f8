//! DataFrame value extraction helpers.
//!
//! Raw region tables are text, so most of the transform works on columns
//! materialized as `Option<String>` cells. A null stays `None`; every other
//! value is rendered with [`any_to_string`].

use polars::prelude::{AnyValue, Column, DataFrame};

use sales_common::any_to_string;

use crate::error::Result;

/// Render one cell, keeping nulls as `None`.
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    }
}

/// Whether a cell is null or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// All cells of a column as text.
pub fn column_cells(column: &Column) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(cell_text(column.get(idx)?));
    }
    Ok(values)
}

/// All cells of a named column as text, or `None` when the column is absent.
pub fn named_column_cells(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    match df.column(name) {
        Ok(column) => Ok(Some(column_cells(column)?)),
        Err(_) => Ok(None),
    }
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn cells_keep_nulls_and_render_numbers() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![Some(1i64), None, Some(3)]).into(),
            Series::new("name".into(), vec![Some("Tea"), Some(" "), None]).into(),
        ])
        .unwrap();

        assert_eq!(
            named_column_cells(&df, "id").unwrap(),
            Some(vec![Some("1".to_string()), None, Some("3".to_string())])
        );
        assert_eq!(named_column_cells(&df, "missing").unwrap(), None);
        assert!(is_blank(Some(" ")));
        assert!(!is_blank(Some("Tea")));
        assert!(has_column(&df, "name"));
        assert_eq!(column_names(&df), vec!["id", "name"]);
    }
}
