//! Transform error types.

use polars::prelude::PolarsError;
use thiserror::Error;

use sales_model::CanonicalField;

/// Errors raised while adapting or consolidating region data.
///
/// Every variant except `Polars` is a schema mismatch between the configured
/// region and the tables it was given, and aborts the run.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{region}: column '{column}' not found during {stage}")]
    MissingColumn {
        region: String,
        column: String,
        stage: &'static str,
    },

    #[error("{region}: column '{column}' already exists during {stage}")]
    ColumnCollision {
        region: String,
        column: String,
        stage: &'static str,
    },

    #[error("{region}: canonical field '{field}' is not resolved by any column")]
    UnresolvedField {
        region: String,
        field: CanonicalField,
    },

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
