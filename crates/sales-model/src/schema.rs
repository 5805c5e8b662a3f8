//! Canonical sales record schema.
//!
//! Every region is projected onto the same fifteen fields in a fixed order.
//! The [`FieldKind`] of a field decides how missing values are filled and
//! whether the value is title-cased.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a canonical field is typed, filled and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Opaque identifier used in joins and the dedup key. Never defaulted.
    Key,
    /// Title-cased text that must be present in the consolidated output.
    /// Never defaulted so that a failed join stays visible.
    Required,
    /// Title-cased categorical text, defaulted to `"Unknown"`.
    Category,
    /// Free text kept as-is, defaulted to `"Unknown"`.
    Text,
    /// Numeric measure, defaulted to `0`.
    Measure,
    /// Region tag attached by the adapter.
    Tag,
}

impl FieldKind {
    /// Value substituted for a missing cell, if the kind has one.
    pub fn default_fill(self) -> Option<&'static str> {
        match self {
            FieldKind::Category | FieldKind::Text => Some(UNKNOWN),
            FieldKind::Measure => Some("0"),
            FieldKind::Key | FieldKind::Required | FieldKind::Tag => None,
        }
    }

    /// Whether values of this kind are trimmed and title-cased.
    pub fn is_title_cased(self) -> bool {
        matches!(self, FieldKind::Required | FieldKind::Category)
    }
}

/// Sentinel for absent categorical values.
pub const UNKNOWN: &str = "Unknown";

/// A field of the canonical sales record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    InvoiceId,
    Date,
    Time,
    Store,
    CustomerId,
    CustomerType,
    Gender,
    ProductId,
    ProductName,
    Category,
    Price,
    Quantity,
    BranchName,
    PaymentMethod,
    Rating,
}

/// Canonical fields in output order.
pub const CANONICAL_FIELDS: [CanonicalField; 15] = [
    CanonicalField::InvoiceId,
    CanonicalField::Date,
    CanonicalField::Time,
    CanonicalField::Store,
    CanonicalField::CustomerId,
    CanonicalField::CustomerType,
    CanonicalField::Gender,
    CanonicalField::ProductId,
    CanonicalField::ProductName,
    CanonicalField::Category,
    CanonicalField::Price,
    CanonicalField::Quantity,
    CanonicalField::BranchName,
    CanonicalField::PaymentMethod,
    CanonicalField::Rating,
];

/// Composite business key identifying duplicate facts.
pub const DEDUP_KEY: [CanonicalField; 4] = [
    CanonicalField::Store,
    CanonicalField::InvoiceId,
    CanonicalField::CustomerId,
    CanonicalField::ProductId,
];

/// Fields that must be present for a row to survive consolidation.
pub const REQUIRED_FIELDS: [CanonicalField; 4] = [
    CanonicalField::InvoiceId,
    CanonicalField::CustomerId,
    CanonicalField::ProductId,
    CanonicalField::BranchName,
];

impl CanonicalField {
    /// Column name in canonical tables.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::InvoiceId => "invoice_id",
            CanonicalField::Date => "date",
            CanonicalField::Time => "time",
            CanonicalField::Store => "store",
            CanonicalField::CustomerId => "customer_id",
            CanonicalField::CustomerType => "customer_type",
            CanonicalField::Gender => "gender",
            CanonicalField::ProductId => "product_id",
            CanonicalField::ProductName => "product_name",
            CanonicalField::Category => "category",
            CanonicalField::Price => "price",
            CanonicalField::Quantity => "quantity",
            CanonicalField::BranchName => "branch_name",
            CanonicalField::PaymentMethod => "payment_method",
            CanonicalField::Rating => "rating",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            CanonicalField::InvoiceId | CanonicalField::CustomerId | CanonicalField::ProductId => {
                FieldKind::Key
            }
            CanonicalField::BranchName => FieldKind::Required,
            CanonicalField::CustomerType
            | CanonicalField::Gender
            | CanonicalField::ProductName
            | CanonicalField::Category
            | CanonicalField::PaymentMethod => FieldKind::Category,
            CanonicalField::Date | CanonicalField::Time => FieldKind::Text,
            CanonicalField::Price | CanonicalField::Quantity | CanonicalField::Rating => {
                FieldKind::Measure
            }
            CanonicalField::Store => FieldKind::Tag,
        }
    }

    /// Canonical column names in output order.
    pub fn column_names() -> Vec<&'static str> {
        CANONICAL_FIELDS.iter().map(|field| field.as_str()).collect()
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CANONICAL_FIELDS
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| format!("unknown canonical field: {s}"))
    }
}
