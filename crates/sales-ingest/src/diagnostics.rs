//! Staging store inspection.

use crate::error::Result;
use crate::store::TableStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// Describe every table in the store, sorted by name.
pub fn describe_tables(store: &TableStore) -> Result<Vec<TableDescription>> {
    let mut descriptions = Vec::new();
    for name in store.list_tables()? {
        let columns = store.read_schema(&name)?;
        let rows = store.row_count(&name)?;
        descriptions.push(TableDescription {
            name,
            columns,
            rows,
        });
    }
    Ok(descriptions)
}
