//! Descriptive statistics over the non-missing values of a column.
//!
//! Estimators match the usual dataframe conventions: sample standard
//! deviation, linearly interpolated quartiles, adjusted Fisher-Pearson
//! skewness and bias-corrected excess kurtosis.

use crate::types::{AggregateOp, DescriptiveStats};
use crate::utils::{quantile_sorted, sort_values};

/// Arithmetic mean.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of unsorted values.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sort_values(&mut sorted);
    quantile_sorted(&sorted, 0.5)
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    Some(variance.sqrt())
}

/// Sums of squared, cubed and fourth-power deviations from the mean.
fn central_sums(values: &[f64]) -> Option<(f64, f64, f64)> {
    let mean = mean(values)?;
    Some(values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - mean;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    }))
}

/// Adjusted Fisher-Pearson skewness; needs at least 3 values.
pub(crate) fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (s2, s3, _) = central_sums(values)?;
    if s2 == 0.0 {
        return Some(0.0);
    }

    let n = n as f64;
    let m2 = s2 / n;
    let m3 = s3 / n;
    let g1 = m3 / m2.powf(1.5);
    Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Bias-corrected excess kurtosis; needs at least 4 values.
pub(crate) fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (s2, _, s4) = central_sums(values)?;
    if s2 == 0.0 {
        return Some(0.0);
    }

    let n = n as f64;
    let numerator = n * (n + 1.0) * (n - 1.0) * s4;
    let denominator = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Some(numerator / denominator - adjustment)
}

/// Apply an aggregate operation.
pub(crate) fn aggregate_values(op: AggregateOp, values: &[f64]) -> Option<f64> {
    match op {
        AggregateOp::Mean => mean(values),
        AggregateOp::Median => median(values),
        AggregateOp::Std => std_dev(values),
    }
}

/// Full descriptive summary of a set of values.
pub(crate) fn describe_values(values: &[f64]) -> DescriptiveStats {
    let mut sorted = values.to_vec();
    sort_values(&mut sorted);

    DescriptiveStats {
        count: values.len(),
        mean: mean(values),
        std: std_dev(values),
        min: sorted.first().copied(),
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
        skew: skewness(values),
        kurtosis: kurtosis(values),
    }
}
