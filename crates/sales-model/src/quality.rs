//! Row quality classification and run reports.
//!
//! The missing-value policy and numeric coercion never fail a row; instead
//! each row is classified so data-quality issues show up in the run summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a joined row did not reach the adapter output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Every cell of the joined row was empty.
    EmptyRow,
    /// Raw price at or above the region's sanity threshold.
    SanityThreshold,
    NonPositiveQuantity,
    /// Price zero or below after conversion.
    NonPositivePrice,
    /// Conversion overflowed to an infinite price.
    NonFinitePrice,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::EmptyRow => "empty row",
            RejectReason::SanityThreshold => "price over sanity threshold",
            RejectReason::NonPositiveQuantity => "quantity <= 0",
            RejectReason::NonPositivePrice => "price <= 0",
            RejectReason::NonFinitePrice => "price not finite",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowQuality {
    /// Every value came from the source.
    Valid,
    /// Kept, but at least one cell was filled by the missing-value policy.
    Defaulted,
    Rejected(RejectReason),
}

/// Aggregate quality of one region adapter run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub region: String,
    /// Rows produced by the joins, before any filtering.
    pub joined_rows: usize,
    pub valid: usize,
    pub defaulted: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    /// Defaulted cells per canonical field name.
    pub defaulted_cells: BTreeMap<String, usize>,
}

impl QualityReport {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, quality: RowQuality) {
        match quality {
            RowQuality::Valid => self.valid += 1,
            RowQuality::Defaulted => self.defaulted += 1,
            RowQuality::Rejected(reason) => *self.rejected.entry(reason).or_insert(0) += 1,
        }
    }

    pub fn record_default(&mut self, field: &str) {
        *self.defaulted_cells.entry(field.to_string()).or_insert(0) += 1;
    }

    pub fn output_rows(&self) -> usize {
        self.valid + self.defaulted
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

/// Outcome of concatenating, deduplicating and filtering all regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub input_rows: usize,
    pub duplicates_dropped: usize,
    pub incomplete_dropped: usize,
    pub output_rows: usize,
}
