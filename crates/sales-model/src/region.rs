//! Declarative region definitions.
//!
//! A [`RegionSpec`] carries everything that differs between regions: the
//! staging tables to read, how each dimension joins onto the fact table, the
//! rename map that resolves suffixed columns to canonical names, and the
//! currency rule. Adding a region means adding a spec, not code.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A dimension table joined onto the sales facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Customer,
    Item,
    Branch,
    Payment,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Customer,
        Dimension::Item,
        Dimension::Branch,
        Dimension::Payment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Customer => "customer",
            Dimension::Item => "item",
            Dimension::Branch => "branch",
            Dimension::Payment => "payment",
        }
    }
}

/// Staging table names for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTables {
    pub sales: String,
    pub customers: String,
    pub items: String,
    pub branches: String,
    pub payments: String,
}

impl RegionTables {
    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Customer => &self.customers,
            Dimension::Item => &self.items,
            Dimension::Branch => &self.branches,
            Dimension::Payment => &self.payments,
        }
    }

    /// All five table names, fact table first.
    pub fn names(&self) -> [&str; 5] {
        [
            &self.sales,
            &self.customers,
            &self.items,
            &self.branches,
            &self.payments,
        ]
    }
}

/// A source file copied into the staging store by the extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the source directory.
    pub path: PathBuf,
    /// Staging table the file is stored as.
    pub table: String,
}

/// How one dimension is left-joined onto the fact rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionJoin {
    pub dimension: Dimension,
    /// Foreign key column on the accumulated (left) side.
    pub fact_key: String,
    /// Key column on the dimension table.
    pub dimension_key: String,
    /// Appended to dimension columns whose name already exists on the left.
    pub suffix: String,
}

impl DimensionJoin {
    pub fn new(dimension: Dimension, fact_key: &str, dimension_key: &str, suffix: &str) -> Self {
        Self {
            dimension,
            fact_key: fact_key.to_string(),
            dimension_key: dimension_key.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

impl ColumnRename {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Conversion of raw prices into the canonical currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRule {
    /// Multiplier from the region's currency to the canonical one.
    pub rate: f64,
    /// Raw prices at or above this value are discarded before conversion.
    ///
    /// A guard against rows already expressed in canonical units; it is not
    /// a business rule and is only set for regions that convert.
    #[serde(default)]
    pub sanity_threshold: Option<f64>,
}

impl CurrencyRule {
    pub const fn identity() -> Self {
        Self {
            rate: 1.0,
            sanity_threshold: None,
        }
    }

    pub fn converts(&self) -> bool {
        self.rate != 1.0
    }
}

/// Everything the region adapter needs to know about one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Store tag written to every output row.
    pub name: String,
    pub tables: RegionTables,
    #[serde(default)]
    pub sources: Vec<SourceFile>,
    /// Applied in order, each on top of the previous join result.
    pub joins: Vec<DimensionJoin>,
    /// Applied in order after all joins.
    #[serde(default)]
    pub renames: Vec<ColumnRename>,
    /// Joined columns removed before cleaning.
    #[serde(default)]
    pub drop_columns: Vec<String>,
    /// Collapse exact-duplicate dimension rows before joining.
    #[serde(default)]
    pub distinct_dimensions: bool,
    pub currency: CurrencyRule,
}

/// JPY to USD rate used for the Japan store.
pub const JPY_TO_USD: f64 = 0.0064;

/// Raw JPY prices at or above this are treated as mis-scaled input.
pub const JPY_SANITY_THRESHOLD: f64 = 100_000.0;

impl RegionSpec {
    /// Four standard joins shared by both built-in regions.
    fn standard_joins() -> Vec<DimensionJoin> {
        vec![
            DimensionJoin::new(Dimension::Customer, "customer_id", "id", "_customer"),
            DimensionJoin::new(Dimension::Item, "product_id", "id", "_item"),
            DimensionJoin::new(Dimension::Branch, "branch_id", "id", "_branch"),
            DimensionJoin::new(Dimension::Payment, "payment", "id", "_payment"),
        ]
    }

    fn sources_for(tables: &RegionTables, folder: &str, files: [&str; 5]) -> Vec<SourceFile> {
        tables
            .names()
            .iter()
            .zip(files)
            .map(|(table, file)| SourceFile {
                path: PathBuf::from(folder).join(file),
                table: (*table).to_string(),
            })
            .collect()
    }

    /// Japan store: prices in JPY, customer type under `membership`.
    pub fn japan() -> Self {
        let tables = RegionTables {
            sales: "japan_store_sales_data".to_string(),
            customers: "japan_store_japan_Customers".to_string(),
            items: "japan_store_japan_items".to_string(),
            branches: "japan_store_japan_branch".to_string(),
            payments: "japan_store_japan_payment".to_string(),
        };
        let sources = Self::sources_for(
            &tables,
            "japan_store",
            [
                "sales_data.csv",
                "japan_Customers.csv",
                "japan_items.csv",
                "japan_branch.csv",
                "japan_payment.csv",
            ],
        );
        Self {
            name: "Japan".to_string(),
            tables,
            sources,
            joins: Self::standard_joins(),
            renames: vec![
                ColumnRename::new("membership", "customer_type"),
                ColumnRename::new("name_branch", "branch_name"),
                ColumnRename::new("name_payment", "payment_method"),
            ],
            drop_columns: Vec::new(),
            distinct_dimensions: true,
            currency: CurrencyRule {
                rate: JPY_TO_USD,
                sanity_threshold: Some(JPY_SANITY_THRESHOLD),
            },
        }
    }

    /// Myanmar store: prices already in USD, item name/type collide with the
    /// customer table and arrive suffixed.
    pub fn myanmar() -> Self {
        let tables = RegionTables {
            sales: "myanmar_store_sales_data".to_string(),
            customers: "myanmar_store_myanmar_customers".to_string(),
            items: "myanmar_store_myanmar_items".to_string(),
            branches: "myanmar_store_myanmar_branch".to_string(),
            payments: "myanmar_store_myanmar_payment".to_string(),
        };
        let sources = Self::sources_for(
            &tables,
            "myanmar_store",
            [
                "sales_data.csv",
                "myanmar_customers.csv",
                "myanmar_items.csv",
                "myanmar_branch.csv",
                "myanmar_payment.csv",
            ],
        );
        Self {
            name: "Myanmar".to_string(),
            tables,
            sources,
            joins: Self::standard_joins(),
            renames: vec![
                ColumnRename::new("name_item", "product_name"),
                ColumnRename::new("type_item", "category"),
                ColumnRename::new("type", "customer_type"),
                ColumnRename::new("name_branch", "branch_name"),
                ColumnRename::new("name_payment", "payment_method"),
            ],
            // Customer name, not part of the canonical record.
            drop_columns: vec!["name".to_string()],
            distinct_dimensions: false,
            currency: CurrencyRule::identity(),
        }
    }

    pub fn join_for(&self, dimension: Dimension) -> Option<&DimensionJoin> {
        self.joins.iter().find(|join| join.dimension == dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_japan_converts() {
        assert!(RegionSpec::japan().currency.converts());
        assert!(!RegionSpec::myanmar().currency.converts());
        assert_eq!(RegionSpec::myanmar().currency.sanity_threshold, None);
    }

    #[test]
    fn sources_cover_every_table() {
        let spec = RegionSpec::myanmar();
        let tables: Vec<&str> = spec.sources.iter().map(|s| s.table.as_str()).collect();
        assert_eq!(tables, spec.tables.names().to_vec());
        assert_eq!(
            spec.sources[0].path,
            PathBuf::from("myanmar_store").join("sales_data.csv")
        );
    }
}
