//! Table storage for the sales pipeline.
//!
//! - **store**: named CSV tables in a directory, read as text, replaced whole
//! - **extract**: the extraction stage copying source files into staging
//! - **diagnostics**: column and row-count listing of a store

pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod store;

pub use diagnostics::{TableDescription, describe_tables};
pub use error::{IngestError, Result};
pub use extract::{ExtractedTable, extract_table, run_extract, source_count};
pub use store::{TableStore, read_csv_file, write_csv_file};
