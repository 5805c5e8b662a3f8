use std::path::PathBuf;

use sales_ingest::ExtractedTable;
use sales_model::{ConsolidationReport, QualityReport};

#[derive(Debug, Clone)]
pub struct ExtractSummary {
    pub tables: Vec<ExtractedTable>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct TransformSummary {
    pub regions: Vec<QualityReport>,
    pub consolidation: ConsolidationReport,
    pub table: String,
    pub path: PathBuf,
    pub fingerprint: String,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    pub path: PathBuf,
    pub fingerprint: String,
}

/// Outcome of a full extract, transform and load run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub extract: ExtractSummary,
    pub transform: TransformSummary,
    pub load: LoadSummary,
}
