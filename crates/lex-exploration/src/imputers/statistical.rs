//! Statistical imputation methods.
//!
//! Fills missing numeric entries with the mean or median of the column's
//! own non-missing values.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::UndefinedFillPolicy;
use crate::error::{ProfilerError, Result};
use crate::profiler::{TableProfiler, aggregate_values};
use crate::types::{ColumnProfile, FillMethod, ImputationSummary, ImputedColumn, ImputedTable};
use crate::utils::numeric_values;

/// Statistical imputation for numeric columns.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Build an imputed copy of the eligible numeric columns.
    ///
    /// A column from `numeric_names` is eligible when its stored missing
    /// percentage is at or below `threshold_percent`. The source table is
    /// left untouched. Columns without missing entries are copied as-is;
    /// filled columns become Float64.
    pub fn impute(
        df: &DataFrame,
        profiles: &[ColumnProfile],
        numeric_names: &[String],
        threshold_percent: f64,
        method: FillMethod,
        policy: UndefinedFillPolicy,
    ) -> Result<ImputedTable> {
        let selected = Self::select_columns(profiles, numeric_names, threshold_percent)?;

        let mut columns = Vec::with_capacity(selected.len());
        let mut imputed = Vec::with_capacity(selected.len());
        let mut unfilled = Vec::new();

        for profile in selected {
            let series = TableProfiler::numeric_series(df, &profile.name)?;
            let (filled, outcome) = Self::fill_series(series, method)?;

            if outcome.fill_value.is_none() && profile.missing_count > 0 {
                match policy {
                    UndefinedFillPolicy::Fail => {
                        return Err(ProfilerError::UndefinedFill(profile.name.clone()));
                    }
                    UndefinedFillPolicy::LeaveMissing => {
                        warn!(
                            "Column '{}' has no values to compute a {} from; left unfilled",
                            profile.name, method
                        );
                        unfilled.push(profile.name.clone());
                    }
                }
            }

            columns.push(filled.into_column());
            imputed.push(outcome);
        }

        let imputed_df = DataFrame::new(columns)?;
        let profiles_after = TableProfiler::profile(&imputed_df)?;

        debug!(
            "Imputed {} columns with {} (threshold {:.1}%)",
            imputed.len(),
            method,
            threshold_percent
        );

        Ok(ImputedTable {
            df: imputed_df,
            summary: ImputationSummary {
                threshold_percent,
                method,
                columns: imputed,
                unfilled,
                profiles: profiles_after,
            },
        })
    }

    /// Profiles of the named columns whose missing percentage is at or
    /// below the threshold, in `numeric_names` order.
    pub fn select_columns<'a>(
        profiles: &'a [ColumnProfile],
        numeric_names: &[String],
        threshold_percent: f64,
    ) -> Result<Vec<&'a ColumnProfile>> {
        let mut selected = Vec::new();

        for name in numeric_names {
            let profile = profiles
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| ProfilerError::ColumnNotFound(name.clone()))?;

            if !profile.kind.is_numeric() {
                return Err(ProfilerError::not_numeric(name));
            }

            if profile.missing_percentage <= threshold_percent {
                selected.push(profile);
            }
        }

        Ok(selected)
    }

    /// Fill the missing entries of one numeric series.
    fn fill_series(series: &Series, method: FillMethod) -> Result<(Series, ImputedColumn)> {
        let values = numeric_values(series)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let fill_value = aggregate_values(method.as_aggregate(), &present);
        let missing = values.len() - present.len();

        let outcome = |filled_count| ImputedColumn {
            name: series.name().to_string(),
            fill_value,
            filled_count,
        };

        let Some(fill) = fill_value.filter(|_| missing > 0) else {
            return Ok((series.clone(), outcome(0)));
        };

        let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
        Ok((
            Series::new(series.name().clone(), filled),
            outcome(missing),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;
    use pretty_assertions::assert_eq;

    fn example_df() -> DataFrame {
        df![
            "a" => [Some(1i64), Some(2), None, Some(4)],
            "b" => ["x", "y", "z", "w"],
            "full" => [10i64, 20, 30, 40],
            "empty" => [Option::<f64>::None, None, None, None],
        ]
        .unwrap()
    }

    fn impute(
        df: &DataFrame,
        names: &[&str],
        threshold: f64,
        method: FillMethod,
    ) -> Result<ImputedTable> {
        let profiles = TableProfiler::profile(df)?;
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        StatisticalImputer::impute(
            df,
            &profiles,
            &names,
            threshold,
            method,
            UndefinedFillPolicy::LeaveMissing,
        )
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        numeric_values(df.column(name).unwrap().as_materialized_series()).unwrap()
    }

    #[test]
    fn test_impute_mean_example() {
        let df = example_df();
        let imputed = impute(&df, &["a"], 50.0, FillMethod::Mean).unwrap();

        assert_eq!(imputed.column_names(), vec!["a".to_string()]);
        let values = f64_values(&imputed.df, "a");
        let expected = 7.0 / 3.0;
        assert!((values[2].unwrap() - expected).abs() < 1e-12);
        assert_eq!(values[0], Some(1.0));
        assert_eq!(values[3], Some(4.0));

        let column = &imputed.summary.columns[0];
        assert_eq!(column.filled_count, 1);
        assert!((column.fill_value.unwrap() - expected).abs() < 1e-12);
        assert_eq!(imputed.summary.profiles[0].missing_count, 0);

        // Source is untouched
        assert_eq!(df.column("a").unwrap().null_count(), 1);
    }

    #[test]
    fn test_impute_median() {
        let df = example_df();
        let imputed = impute(&df, &["a"], 100.0, FillMethod::Median).unwrap();
        assert_eq!(f64_values(&imputed.df, "a")[2], Some(2.0));
        assert_eq!(imputed.summary.method, FillMethod::Median);
    }

    #[test]
    fn test_impute_zero_threshold_keeps_only_complete_columns() {
        let df = example_df();
        let imputed = impute(&df, &["a", "full", "empty"], 0.0, FillMethod::Mean).unwrap();

        assert_eq!(imputed.column_names(), vec!["full".to_string()]);
        // Complete columns are returned unchanged, dtype included
        let full = imputed.df.column("full").unwrap();
        assert_eq!(full.dtype(), &DataType::Int64);
        assert!(full.as_materialized_series().equals(df.column("full").unwrap().as_materialized_series()));
        assert_eq!(imputed.summary.columns[0].filled_count, 0);
    }

    #[test]
    fn test_impute_full_threshold_fills_everything_fillable() {
        let df = example_df();
        let imputed = impute(&df, &["a", "full", "empty"], 100.0, FillMethod::Mean).unwrap();

        assert_eq!(imputed.df.width(), 3);
        assert_eq!(imputed.df.column("a").unwrap().null_count(), 0);
        assert_eq!(imputed.df.column("full").unwrap().null_count(), 0);
        // No values to average: left missing and reported
        assert_eq!(imputed.summary.unfilled, vec!["empty".to_string()]);
        assert_eq!(imputed.df.column("empty").unwrap().null_count(), 4);
        assert_eq!(imputed.summary.columns[2].fill_value, None);
    }

    #[test]
    fn test_impute_undefined_fill_policy_fail() {
        let df = example_df();
        let profiles = TableProfiler::profile(&df).unwrap();

        let err = StatisticalImputer::impute(
            &df,
            &profiles,
            &["empty".to_string()],
            100.0,
            FillMethod::Median,
            UndefinedFillPolicy::Fail,
        )
        .unwrap_err();

        assert!(matches!(err, ProfilerError::UndefinedFill(name) if name == "empty"));
    }

    #[test]
    fn test_impute_treats_nan_as_missing() {
        let df = df!["x" => [Some(1.0f64), Some(f64::NAN), Some(3.0)]].unwrap();
        let imputed = impute(&df, &["x"], 50.0, FillMethod::Mean).unwrap();
        assert_eq!(f64_values(&imputed.df, "x"), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_impute_rejects_categorical_and_unknown_names() {
        let df = example_df();

        let err = impute(&df, &["b"], 100.0, FillMethod::Mean).unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidColumnKind { .. }));

        let err = impute(&df, &["missing"], 100.0, FillMethod::Mean).unwrap_err();
        assert!(matches!(err, ProfilerError::ColumnNotFound(_)));
    }

    #[test]
    fn test_select_columns_uses_stored_percentages() {
        let profiles = vec![
            ColumnProfile {
                name: "p".to_string(),
                dtype: "f64".to_string(),
                kind: ColumnKind::Numeric,
                missing_count: 1,
                missing_percentage: 10.0,
            },
            ColumnProfile {
                name: "q".to_string(),
                dtype: "f64".to_string(),
                kind: ColumnKind::Numeric,
                missing_count: 3,
                missing_percentage: 30.0,
            },
        ];

        let names = vec!["q".to_string(), "p".to_string()];
        let selected = StatisticalImputer::select_columns(&profiles, &names, 10.0).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "p");

        let selected = StatisticalImputer::select_columns(&profiles, &names, 30.0).unwrap();
        let order: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["q", "p"]);
    }
}
