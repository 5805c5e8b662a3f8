//! Shared utilities for the sales reconciliation crates.
//!
//! This crate provides the value-level helpers used across the workspace:
//! Polars `AnyValue` conversions, numeric coercion and rounding, and the
//! text normalization applied to column names, join keys and categories.

pub mod numeric;
pub mod polars;
pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use numeric::{coerce_measure, format_numeric, parse_f64, round_to_cents};
pub use polars::{any_to_f64, any_to_string, clean_column_names};
pub use text::{clean_column_name, normalize_key, title_case};
