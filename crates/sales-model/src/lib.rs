//! Data model for the regional sales reconciliation pipeline.
//!
//! - **schema**: the canonical sales record fields and their kinds
//! - **region**: declarative per-region adapter definitions
//! - **config**: pipeline locations and the registered regions
//! - **quality**: per-row quality classification and run reports

pub mod config;
pub mod error;
pub mod quality;
pub mod region;
pub mod schema;

pub use config::{DEFAULT_OUTPUT_TABLE, PipelineConfig};
pub use error::{Result, SalesError};
pub use quality::{ConsolidationReport, QualityReport, RejectReason, RowQuality};
pub use region::{
    ColumnRename, CurrencyRule, Dimension, DimensionJoin, RegionSpec, RegionTables, SourceFile,
};
pub use schema::{CANONICAL_FIELDS, CanonicalField, DEDUP_KEY, FieldKind, REQUIRED_FIELDS};
