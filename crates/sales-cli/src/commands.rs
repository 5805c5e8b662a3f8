use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use sales_cli::pipeline::{self, PipelineObserver, Stage};
use sales_ingest::{ExtractedTable, source_count};
use sales_model::PipelineConfig;

use crate::cli::Cli;
use crate::summary::{
    print_diagnostics, print_extract_summary, print_load_summary, print_regions,
    print_run_summary, print_transform_summary,
};

/// Build the pipeline configuration from the config file and flags.
pub fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path).context("load configuration")?,
        None => PipelineConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Prints stage progress and drives the extraction spinner.
struct ConsoleObserver {
    spinner: Option<ProgressBar>,
    sources: usize,
}

impl ConsoleObserver {
    fn new(config: &PipelineConfig) -> Self {
        Self {
            spinner: None,
            sources: source_count(config),
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn stage_started(&mut self, stage: Stage) {
        println!("Step {}: {}...", stage.number(), stage.label());
        if stage == Stage::Extract {
            self.spinner = Some(extract_spinner(self.sources));
        }
    }

    fn stage_completed(&mut self, stage: Stage) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        println!("Step {} Complete.", stage.number());
    }

    fn table_extracted(&mut self, table: &ExtractedTable) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(table.table.clone());
            spinner.inc(1);
        }
    }
}

fn extract_spinner(total: usize) -> ProgressBar {
    let spinner = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn run_all(config: &PipelineConfig) -> Result<()> {
    let mut observer = ConsoleObserver::new(config);
    let result = pipeline::run_pipeline(config, &mut observer)?;
    print_run_summary(&result);
    Ok(())
}

pub fn run_extract(config: &PipelineConfig) -> Result<()> {
    let spinner = extract_spinner(source_count(config));
    let summary = pipeline::extract(config, |table| {
        spinner.set_message(table.table.clone());
        spinner.inc(1);
    });
    spinner.finish_and_clear();
    print_extract_summary(&summary?);
    Ok(())
}

pub fn run_transform(config: &PipelineConfig) -> Result<()> {
    let summary = pipeline::transform(config)?;
    print_transform_summary(&summary);
    Ok(())
}

pub fn run_load(config: &PipelineConfig) -> Result<()> {
    let summary = pipeline::load(config)?;
    print_load_summary(&summary);
    Ok(())
}

pub fn run_diagnose(config: &PipelineConfig) -> Result<()> {
    let tables = pipeline::diagnose(config)?;
    print_diagnostics(&config.staging_dir(), &tables);
    Ok(())
}

pub fn run_regions(config: &PipelineConfig) {
    print_regions(config);
}
