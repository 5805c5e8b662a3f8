//! Extraction stage: copy each configured source file into the staging store.

use std::path::PathBuf;

use tracing::info;

use sales_model::{PipelineConfig, SourceFile};

use crate::error::Result;
use crate::store::{TableStore, read_csv_file};

/// One source file copied into staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub region: String,
    pub table: String,
    pub source: PathBuf,
    pub rows: usize,
}

/// Number of source files the extraction stage will copy.
pub fn source_count(config: &PipelineConfig) -> usize {
    config.regions.iter().map(|region| region.sources.len()).sum()
}

/// Copy one source file into staging, replacing the table.
pub fn extract_table(
    config: &PipelineConfig,
    staging: &TableStore,
    region: &str,
    source: &SourceFile,
) -> Result<ExtractedTable> {
    let path = config.source_dir().join(&source.path);
    let df = read_csv_file(&path)?;
    let rows = staging.write_table(&source.table, &df)?;
    info!(
        region,
        table = %source.table,
        source = %path.display(),
        rows,
        "table extracted"
    );
    Ok(ExtractedTable {
        region: region.to_string(),
        table: source.table.clone(),
        source: path,
        rows,
    })
}

/// Copy every region's source files, in registration order.
///
/// `on_table` is called after each table is written.
pub fn run_extract<F>(
    config: &PipelineConfig,
    staging: &TableStore,
    mut on_table: F,
) -> Result<Vec<ExtractedTable>>
where
    F: FnMut(&ExtractedTable),
{
    let mut extracted = Vec::with_capacity(source_count(config));
    for region in &config.regions {
        for source in &region.sources {
            let table = extract_table(config, staging, &region.name, source)?;
            on_table(&table);
            extracted.push(table);
        }
    }
    Ok(extracted)
}
