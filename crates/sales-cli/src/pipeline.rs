//! Sales pipeline with explicit stages.
//!
//! The pipeline runs these stages strictly in order:
//! 1. **Extract**: copy every configured source CSV into the staging store
//! 2. **Transform**: adapt each region, consolidate, and replace the
//!    canonical table in the transformation store
//! 3. **Load**: copy the canonical table into the presentation store
//!
//! Any failure aborts the run; tables written by earlier stages are kept.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use sales_ingest::{ExtractedTable, TableDescription, TableStore, describe_tables, run_extract};
use sales_model::PipelineConfig;
use sales_transform::{Consolidator, RegionAdapter, RegionInput};

use crate::types::{ExtractSummary, LoadSummary, RunResult, TransformSummary};

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Extract, Stage::Transform, Stage::Load];

    /// 1-based position in the run.
    pub fn number(self) -> usize {
        match self {
            Stage::Extract => 1,
            Stage::Transform => 2,
            Stage::Load => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "Extracting data",
            Stage::Transform => "Transforming data",
            Stage::Load => "Loading data",
        }
    }
}

/// Receives progress notifications from [`run_pipeline`].
pub trait PipelineObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_completed(&mut self, _stage: Stage) {}
    fn table_extracted(&mut self, _table: &ExtractedTable) {}
}

impl PipelineObserver for () {}

// ============================================================================
// Stage 1: Extract
// ============================================================================

/// Copy every source file into the staging store.
pub fn extract<F>(config: &PipelineConfig, on_table: F) -> Result<ExtractSummary>
where
    F: FnMut(&ExtractedTable),
{
    let span = info_span!("extract");
    let _guard = span.enter();
    let start = Instant::now();

    let staging = TableStore::open(config.staging_dir()).context("open staging store")?;
    let tables = run_extract(config, &staging, on_table).context("extract source tables")?;
    let duration_ms = start.elapsed().as_millis();
    info!(
        tables = tables.len(),
        row_count = tables.iter().map(|table| table.rows).sum::<usize>(),
        duration_ms,
        "extract complete"
    );
    Ok(ExtractSummary {
        tables,
        duration_ms,
    })
}

// ============================================================================
// Stage 2: Transform
// ============================================================================

/// Adapt every region from staging, consolidate, and replace the canonical table.
pub fn transform(config: &PipelineConfig) -> Result<TransformSummary> {
    let span = info_span!("transform", table = %config.output_table);
    let _guard = span.enter();
    let start = Instant::now();

    let staging = TableStore::open(config.staging_dir()).context("open staging store")?;
    let target =
        TableStore::open(config.transform_dir()).context("open transformation store")?;

    let mut frames = Vec::with_capacity(config.regions.len());
    let mut regions = Vec::with_capacity(config.regions.len());
    for spec in &config.regions {
        let input = RegionInput::load(&spec.tables, |table| staging.read_table(table))
            .with_context(|| format!("read staging tables for {}", spec.name))?;
        let output = RegionAdapter::new(spec.clone())
            .run(&input)
            .with_context(|| format!("transform region {}", spec.name))?;
        regions.push(output.quality);
        frames.push(output.frame);
    }

    let consolidated = Consolidator::new()
        .consolidate(&frames)
        .context("consolidate regions")?;
    let rows = target
        .write_table(&config.output_table, &consolidated.frame.data)
        .with_context(|| format!("write {}", config.output_table))?;
    let fingerprint = target
        .fingerprint(&config.output_table)
        .with_context(|| format!("fingerprint {}", config.output_table))?;
    let duration_ms = start.elapsed().as_millis();
    info!(row_count = rows, duration_ms, "transform complete");

    Ok(TransformSummary {
        regions,
        consolidation: consolidated.report,
        table: config.output_table.clone(),
        path: target.table_path(&config.output_table),
        fingerprint,
        duration_ms,
    })
}

// ============================================================================
// Stage 3: Load
// ============================================================================

/// Copy the canonical table into the presentation store, replacing it.
pub fn load(config: &PipelineConfig) -> Result<LoadSummary> {
    let span = info_span!("load", table = %config.output_table);
    let _guard = span.enter();

    let source =
        TableStore::open(config.transform_dir()).context("open transformation store")?;
    let target =
        TableStore::open(config.presentation_dir()).context("open presentation store")?;
    let data = source
        .read_table(&config.output_table)
        .with_context(|| format!("read {}", config.output_table))?;
    let rows = target
        .write_table(&config.output_table, &data)
        .with_context(|| format!("write {}", config.output_table))?;
    let fingerprint = target
        .fingerprint(&config.output_table)
        .with_context(|| format!("fingerprint {}", config.output_table))?;
    info!(row_count = rows, "load complete");

    Ok(LoadSummary {
        table: config.output_table.clone(),
        rows,
        path: target.table_path(&config.output_table),
        fingerprint,
    })
}

/// Run extract, transform and load in sequence.
pub fn run_pipeline(
    config: &PipelineConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<RunResult> {
    observer.stage_started(Stage::Extract);
    let extract = extract(config, |table| observer.table_extracted(table))?;
    observer.stage_completed(Stage::Extract);

    observer.stage_started(Stage::Transform);
    let transform = transform(config)?;
    observer.stage_completed(Stage::Transform);

    observer.stage_started(Stage::Load);
    let load = load(config)?;
    observer.stage_completed(Stage::Load);

    Ok(RunResult {
        extract,
        transform,
        load,
    })
}

/// Describe every table currently in the staging store.
pub fn diagnose(config: &PipelineConfig) -> Result<Vec<TableDescription>> {
    let staging = TableStore::open(config.staging_dir()).context("open staging store")?;
    describe_tables(&staging).context("describe staging tables")
}
