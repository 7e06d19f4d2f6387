use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Column Metadata
// ============================================================================

/// Declared kind of a column, derived from its value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Integer or floating point values
    Numeric,
    /// Text and every other non-numeric value type
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column metadata: type and missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Polars data type as string ("i64", "f64", "str", ...)
    pub dtype: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    /// Missing values as a percentage of the row count (0 - 100).
    pub missing_percentage: f64,
}

// ============================================================================
// Statistics
// ============================================================================

/// Descriptive statistics of a numeric column.
///
/// Missing values are ignored. Statistics that are undefined for the sample
/// size (e.g. `std` of a single value) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
    pub skew: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl DescriptiveStats {
    /// Labelled rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
            ("skew", self.skew),
            ("kurtosis", self.kurtosis),
        ]
    }
}

/// Descriptive statistics for a named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub stats: DescriptiveStats,
}

/// Descriptive statistics of every numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescribeTable {
    pub columns: Vec<ColumnStats>,
    /// When true, renderers show one row per column instead of one row
    /// per statistic.
    pub transposed: bool,
}

/// A single histogram bin. `end` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub counts: Vec<usize>,
    /// Bin edges; always one more than `counts`.
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Iterate over the bins as (start, end, count).
    pub fn bins(&self) -> impl Iterator<Item = HistogramBin> + '_ {
        self.counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&count, edge)| HistogramBin {
                start: edge[0],
                end: edge[1],
                count,
            })
    }

    /// Number of values counted across all bins.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Aggregate operation applied to every numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Mean,
    Median,
    Std,
}

impl AggregateOp {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            AggregateOp::Mean => "Mean",
            AggregateOp::Median => "Median",
            AggregateOp::Std => "Standard deviation",
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scalar computed for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub name: String,
    pub value: Option<f64>,
}

/// Result of applying an [`AggregateOp`] to a set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub op: AggregateOp,
    pub values: Vec<ColumnValue>,
}

// ============================================================================
// Imputation
// ============================================================================

/// Value used to fill missing numeric entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FillMethod {
    #[default]
    Mean,
    Median,
}

impl FillMethod {
    /// The aggregate that produces the fill value.
    pub fn as_aggregate(&self) -> AggregateOp {
        match self {
            FillMethod::Mean => AggregateOp::Mean,
            FillMethod::Median => AggregateOp::Median,
        }
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_aggregate().label())
    }
}

/// Outcome of imputing a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputedColumn {
    pub name: String,
    /// `None` when the column had no value to compute it from.
    pub fill_value: Option<f64>,
    pub filled_count: usize,
}

/// Serializable description of an imputation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationSummary {
    pub threshold_percent: f64,
    pub method: FillMethod,
    pub columns: Vec<ImputedColumn>,
    /// Selected columns left with missing entries (no fill value exists).
    pub unfilled: Vec<String>,
    /// Column profiles of the imputed table.
    pub profiles: Vec<ColumnProfile>,
}

/// Imputed copy of the selected numeric columns.
#[derive(Debug, Clone)]
pub struct ImputedTable {
    pub df: DataFrame,
    pub summary: ImputationSummary,
}

impl ImputedTable {
    pub fn column_names(&self) -> Vec<String> {
        self.summary.columns.iter().map(|c| c.name.clone()).collect()
    }
}
