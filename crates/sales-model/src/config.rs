//! Pipeline configuration.
//!
//! Locations and the region table are carried in one explicit value that the
//! driver hands to each stage; nothing is looked up globally.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};
use crate::region::{Dimension, RegionSpec};

/// Name of the consolidated table in the transformation and presentation stores.
pub const DEFAULT_OUTPUT_TABLE: &str = "all_sales_big_table";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root holding `Source/`, `Staging/`, `Transformation/` and `Presentation/`.
    pub data_dir: PathBuf,
    pub output_table: String,
    /// Registration order is the concatenation order used for deduplication.
    pub regions: Vec<RegionSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_table: DEFAULT_OUTPUT_TABLE.to_string(),
            regions: vec![RegionSpec::japan(), RegionSpec::myanmar()],
        }
    }
}

impl PipelineConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SalesError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SalesError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        self.data_dir.join("Source")
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.data_dir.join("Staging")
    }

    pub fn transform_dir(&self) -> PathBuf {
        self.data_dir.join("Transformation")
    }

    pub fn presentation_dir(&self) -> PathBuf {
        self.data_dir.join("Presentation")
    }

    pub fn region(&self, name: &str) -> Option<&RegionSpec> {
        self.regions
            .iter()
            .find(|region| region.name.eq_ignore_ascii_case(name))
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.output_table.trim().is_empty() {
            return Err(SalesError::InvalidConfig("output table name is empty".into()));
        }
        if self.regions.is_empty() {
            return Err(SalesError::InvalidConfig("no regions configured".into()));
        }
        let mut names = BTreeSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(SalesError::InvalidConfig("region with empty name".into()));
            }
            if !names.insert(region.name.to_lowercase()) {
                return Err(SalesError::InvalidConfig(format!(
                    "duplicate region {}",
                    region.name
                )));
            }
            let rate = region.currency.rate;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SalesError::InvalidConfig(format!(
                    "region {}: conversion rate must be positive, got {rate}",
                    region.name
                )));
            }
            if let Some(threshold) = region.currency.sanity_threshold
                && (!threshold.is_finite() || threshold <= 0.0)
            {
                return Err(SalesError::InvalidConfig(format!(
                    "region {}: sanity threshold must be positive, got {threshold}",
                    region.name
                )));
            }
            if region.currency.sanity_threshold.is_some() && !region.currency.converts() {
                return Err(SalesError::InvalidConfig(format!(
                    "region {}: sanity threshold set on a region that does not convert",
                    region.name
                )));
            }
            for dimension in Dimension::ALL {
                let count = region
                    .joins
                    .iter()
                    .filter(|join| join.dimension == dimension)
                    .count();
                if count != 1 {
                    return Err(SalesError::InvalidConfig(format!(
                        "region {}: expected exactly one {} join, found {count}",
                        region.name,
                        dimension.as_str()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().expect("valid default");
        assert_eq!(config.staging_dir(), PathBuf::from("data").join("Staging"));
        assert_eq!(config.regions[0].name, "Japan");
        assert_eq!(config.regions[1].name, "Myanmar");
    }

    #[test]
    fn rejects_duplicate_regions() {
        let mut config = PipelineConfig::default();
        config.regions.push(RegionSpec::japan());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate region Japan"));
    }

    #[test]
    fn rejects_missing_join() {
        let mut config = PipelineConfig::default();
        config.regions[1].joins.retain(|j| j.dimension != Dimension::Payment);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("payment join"));
    }

    #[test]
    fn rejects_threshold_without_conversion() {
        let mut config = PipelineConfig::default();
        config.regions[1].currency.sanity_threshold = Some(1_000.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("does not convert"), "{err}");

        config.regions[1].currency.rate = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_rate() {
        let mut config = PipelineConfig::default();
        config.regions[0].currency.rate = 0.0;
        assert!(config.validate().is_err());
    }
}
