//! Table profiling module.
//!
//! This module provides functionality for profiling a loaded table:
//! - Per-column type and missing-value metadata
//! - Numeric vs. categorical column split
//! - Descriptive statistics and histograms of numeric columns
//! - Aggregates across numeric columns

mod histogram;
mod statistics;

use polars::prelude::*;
use tracing::debug;

use crate::error::{ProfilerError, Result};
use crate::types::{
    AggregateOp, AggregateResult, ColumnKind, ColumnProfile, ColumnStats, ColumnValue,
    DescribeTable, DescriptiveStats, Histogram,
};
use crate::utils::{column_kind, distinct_values, missing_count, missing_percentage, present_values};

pub use histogram::bin_count_for;
pub(crate) use statistics::aggregate_values;

/// Profiler for a loaded table. Every operation is a pure function of the
/// table and its parameters.
pub struct TableProfiler;

impl TableProfiler {
    /// Profile every column of the table, in column order.
    pub fn profile(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
        let profiles = df
            .get_columns()
            .iter()
            .map(|col| Self::profile_column(col.as_materialized_series(), df.height()))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Profiled {} columns over {} rows",
            profiles.len(),
            df.height()
        );
        Ok(profiles)
    }

    fn profile_column(series: &Series, row_count: usize) -> Result<ColumnProfile> {
        let missing = missing_count(series)?;

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: series.dtype().to_string(),
            kind: column_kind(series.dtype()),
            missing_count: missing,
            missing_percentage: missing_percentage(missing, row_count),
        })
    }

    /// Partition column names into (numeric, categorical), keeping order.
    pub fn split_columns(profiles: &[ColumnProfile]) -> (Vec<String>, Vec<String>) {
        let (numeric, categorical): (Vec<&ColumnProfile>, Vec<&ColumnProfile>) =
            profiles.iter().partition(|p| p.kind.is_numeric());

        (
            numeric.into_iter().map(|p| p.name.clone()).collect(),
            categorical.into_iter().map(|p| p.name.clone()).collect(),
        )
    }

    /// Profiles of the columns that have at least one missing value.
    pub fn missing_summary(profiles: &[ColumnProfile]) -> Vec<ColumnProfile> {
        profiles
            .iter()
            .filter(|p| p.missing_count > 0)
            .cloned()
            .collect()
    }

    /// Descriptive statistics of a numeric column.
    pub fn describe_column(df: &DataFrame, col_name: &str) -> Result<DescriptiveStats> {
        let values = Self::numeric_column(df, col_name)?;
        Ok(statistics::describe_values(&values))
    }

    /// Descriptive statistics of each named numeric column.
    pub fn describe_all(
        df: &DataFrame,
        col_names: &[String],
        transposed: bool,
    ) -> Result<DescribeTable> {
        let columns = col_names
            .iter()
            .map(|name| {
                Ok(ColumnStats {
                    name: name.clone(),
                    stats: Self::describe_column(df, name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DescribeTable {
            columns,
            transposed,
        })
    }

    /// Number of distinct non-missing values of a numeric column.
    pub fn distinct_count(df: &DataFrame, col_name: &str) -> Result<usize> {
        let values = Self::numeric_column(df, col_name)?;
        Ok(distinct_values(&values))
    }

    /// Histogram of a numeric column with an explicit bin count.
    pub fn histogram(df: &DataFrame, col_name: &str, bin_count: usize) -> Result<Histogram> {
        if bin_count == 0 {
            return Err(ProfilerError::InvalidConfig(
                "histogram bin count must be at least 1".to_string(),
            ));
        }
        let values = Self::numeric_column(df, col_name)?;
        Ok(histogram::equal_width(col_name, &values, bin_count))
    }

    /// Histogram of a numeric column with the bin count derived from its
    /// number of distinct values (see [`bin_count_for`]).
    pub fn auto_histogram(df: &DataFrame, col_name: &str) -> Result<Histogram> {
        let values = Self::numeric_column(df, col_name)?;
        let bins = bin_count_for(distinct_values(&values));
        debug!("Histogram of '{}' with {} bins", col_name, bins);
        Ok(histogram::equal_width(col_name, &values, bins))
    }

    /// Apply `op` independently to each named numeric column.
    pub fn aggregate(df: &DataFrame, col_names: &[String], op: AggregateOp) -> Result<AggregateResult> {
        let values = col_names
            .iter()
            .map(|name| {
                let column = Self::numeric_column(df, name)?;
                Ok(ColumnValue {
                    name: name.clone(),
                    value: aggregate_values(op, &column),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AggregateResult { op, values })
    }

    /// Non-missing values of a numeric column.
    ///
    /// Fails with `ColumnNotFound` or `InvalidColumnKind`.
    pub(crate) fn numeric_column(df: &DataFrame, col_name: &str) -> Result<Vec<f64>> {
        let series = Self::numeric_series(df, col_name)?;
        Ok(present_values(series)?)
    }

    pub(crate) fn numeric_series<'a>(df: &'a DataFrame, col_name: &str) -> Result<&'a Series> {
        let col = df
            .column(col_name)
            .map_err(|_| ProfilerError::ColumnNotFound(col_name.to_string()))?;
        let series = col.as_materialized_series();

        if column_kind(series.dtype()) != ColumnKind::Numeric {
            return Err(ProfilerError::not_numeric(col_name));
        }
        Ok(series)
    }
}
