//! Relational left join of a dimension table onto the accumulated facts.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use sales_common::normalize_key;
use sales_model::DimensionJoin;

use crate::data_utils::{column_cells, column_names};
use crate::error::{Result, TransformError};

/// Left-join `right` onto `left` using `join`'s key columns.
///
/// - Every left row is kept. A row matching several right rows is repeated
///   once per match, in right-table order; an unmatched row gets nulls.
/// - Keys compare after [`normalize_key`], so `"7"` matches `"7.0"`. Null
///   and blank keys never match.
/// - Left columns keep their names. A right column whose name is already on
///   the left gets the join suffix; a suffixed name that still collides is a
///   [`TransformError::ColumnCollision`].
pub fn left_join(
    region: &str,
    left: &DataFrame,
    right: &DataFrame,
    join: &DimensionJoin,
) -> Result<DataFrame> {
    let left_keys = key_cells(region, left, &join.fact_key)?;
    let right_keys = key_cells(region, right, &join.dimension_key)?;

    let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, key) in right_keys.into_iter().enumerate() {
        if let Some(key) = key {
            lookup.entry(key).or_default().push(idx);
        }
    }

    let mut left_rows = Vec::with_capacity(left.height());
    let mut right_rows: Vec<Option<usize>> = Vec::with_capacity(left.height());
    for (idx, key) in left_keys.iter().enumerate() {
        match key.as_ref().and_then(|key| lookup.get(key)) {
            Some(matches) => {
                for &matched in matches {
                    left_rows.push(Some(idx));
                    right_rows.push(Some(matched));
                }
            }
            None => {
                left_rows.push(Some(idx));
                right_rows.push(None);
            }
        }
    }

    let mut taken: HashSet<String> = column_names(left).into_iter().collect();
    let mut columns: Vec<Column> = Vec::with_capacity(left.width() + right.width());
    for column in left.get_columns() {
        columns.push(gather(column, column.name().as_str(), &left_rows)?);
    }
    for column in right.get_columns() {
        let name = output_name(region, column.name().as_str(), &join.suffix, &taken)?;
        columns.push(gather(column, &name, &right_rows)?);
        taken.insert(name);
    }
    Ok(DataFrame::new(columns)?)
}

fn key_cells(region: &str, df: &DataFrame, key: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(key)
        .map_err(|_| TransformError::MissingColumn {
            region: region.to_string(),
            column: key.to_string(),
            stage: "join",
        })?;
    Ok(column_cells(column)?
        .into_iter()
        .map(|cell| cell.as_deref().and_then(normalize_key))
        .collect())
}

fn output_name(region: &str, name: &str, suffix: &str, taken: &HashSet<String>) -> Result<String> {
    if !taken.contains(name) {
        return Ok(name.to_string());
    }
    let suffixed = format!("{name}{suffix}");
    if taken.contains(&suffixed) {
        return Err(TransformError::ColumnCollision {
            region: region.to_string(),
            column: suffixed,
            stage: "join",
        });
    }
    Ok(suffixed)
}

/// Pick rows of `column` by index; `None` produces a null.
fn gather(column: &Column, name: &str, rows: &[Option<usize>]) -> Result<Column> {
    let cells = column_cells(column)?;
    let values: Vec<Option<String>> = rows
        .iter()
        .map(|row| row.and_then(|idx| cells.get(idx).cloned().flatten()))
        .collect();
    Ok(Series::new(name.into(), values).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_model::Dimension;

    fn sales() -> DataFrame {
        DataFrame::new(vec![
            Series::new("invoice_id".into(), vec!["A", "B", "C"]).into(),
            Series::new("customer_id".into(), vec![Some("1"), Some("9"), None]).into(),
        ])
        .unwrap()
    }

    fn customers() -> DataFrame {
        DataFrame::new(vec![
            Series::new("id".into(), vec!["1.0", "2"]).into(),
            Series::new("membership".into(), vec!["member", "normal"]).into(),
        ])
        .unwrap()
    }

    fn customer_join() -> DimensionJoin {
        DimensionJoin::new(Dimension::Customer, "customer_id", "id", "_customer")
    }

    fn cells(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        column_cells(df.column(name).unwrap()).unwrap()
    }

    #[test]
    fn unmatched_and_null_keys_keep_the_fact_row() {
        let joined = left_join("Japan", &sales(), &customers(), &customer_join()).unwrap();
        assert_eq!(joined.height(), 3);
        assert_eq!(
            cells(&joined, "membership"),
            vec![Some("member".to_string()), None, None]
        );
        assert_eq!(
            column_names(&joined),
            vec!["invoice_id", "customer_id", "id", "membership"]
        );
    }

    #[test]
    fn multiple_matches_repeat_the_fact_row() {
        let customers = DataFrame::new(vec![
            Series::new("id".into(), vec!["1", "1"]).into(),
            Series::new("membership".into(), vec!["member", "gold"]).into(),
        ])
        .unwrap();
        let joined = left_join("Japan", &sales(), &customers, &customer_join()).unwrap();
        assert_eq!(joined.height(), 4);
        assert_eq!(
            cells(&joined, "invoice_id"),
            vec![
                Some("A".to_string()),
                Some("A".to_string()),
                Some("B".to_string()),
                Some("C".to_string()),
            ]
        );
    }

    #[test]
    fn colliding_right_columns_get_the_suffix() {
        let left = DataFrame::new(vec![
            Series::new("product_id".into(), vec!["5"]).into(),
            Series::new("id".into(), vec!["1"]).into(),
            Series::new("name".into(), vec!["Aye"]).into(),
        ])
        .unwrap();
        let items = DataFrame::new(vec![
            Series::new("id".into(), vec!["5"]).into(),
            Series::new("name".into(), vec!["Tea"]).into(),
        ])
        .unwrap();
        let join = DimensionJoin::new(Dimension::Item, "product_id", "id", "_item");
        let joined = left_join("Myanmar", &left, &items, &join).unwrap();
        assert_eq!(
            column_names(&joined),
            vec!["product_id", "id", "name", "id_item", "name_item"]
        );
        assert_eq!(cells(&joined, "name_item"), vec![Some("Tea".to_string())]);
        assert_eq!(cells(&joined, "name"), vec![Some("Aye".to_string())]);
    }

    #[test]
    fn suffix_collision_is_an_error() {
        let left = DataFrame::new(vec![
            Series::new("product_id".into(), vec!["5"]).into(),
            Series::new("name".into(), vec!["Aye"]).into(),
            Series::new("name_item".into(), vec!["Old"]).into(),
        ])
        .unwrap();
        let items = DataFrame::new(vec![
            Series::new("id".into(), vec!["5"]).into(),
            Series::new("name".into(), vec!["Tea"]).into(),
        ])
        .unwrap();
        let join = DimensionJoin::new(Dimension::Item, "product_id", "id", "_item");
        let err = left_join("Myanmar", &left, &items, &join).unwrap_err();
        assert!(matches!(
            err,
            TransformError::ColumnCollision { ref column, .. } if column == "name_item"
        ));
    }

    #[test]
    fn missing_key_column_is_reported() {
        let join = DimensionJoin::new(Dimension::Branch, "branch_id", "id", "_branch");
        let err = left_join("Japan", &sales(), &customers(), &join).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingColumn { ref column, stage: "join", .. } if column == "branch_id"
        ));
    }
}
