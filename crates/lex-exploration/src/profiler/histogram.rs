//! Equal-width histogram binning.

use crate::types::Histogram;

/// Bin count for a column with `distinct` distinct values: 100 bins up to
/// 100 distinct values, one bin per ten distinct values above that.
pub fn bin_count_for(distinct: usize) -> usize {
    if distinct <= 100 {
        100
    } else {
        ((distinct as f64 / 10.0).round_ties_even() as usize).max(1)
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// Every bin is half-open `[start, end)` except the last, which also holds
/// the maximum. A constant column is widened to `[v - 0.5, v + 0.5]` and an
/// empty one spans `[0, 1]`. Ranges wider than `f64::MAX` (such as
/// `[-1e308, 1e308]`) still get finite edges.
pub(crate) fn equal_width(column: &str, values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (lo, hi) = value_range(values);

    let span = hi - lo;
    let mut edges: Vec<f64> = if span.is_finite() {
        let width = span / bins as f64;
        (0..=bins).map(|i| lo + i as f64 * width).collect()
    } else {
        (0..=bins)
            .map(|i| {
                let t = i as f64 / bins as f64;
                lo * (1.0 - t) + hi * t
            })
            .collect()
    };
    edges[bins] = hi;

    let mut counts = vec![0usize; bins];
    // Halved so the span cannot overflow
    let half_span = hi / 2.0 - lo / 2.0;
    for &value in values {
        let fraction = (value / 2.0 - lo / 2.0) / half_span;
        let mut index = ((fraction * bins as f64) as usize).min(bins - 1);
        // Correct float rounding against the materialized edges
        if value < edges[index] && index > 0 {
            index -= 1;
        } else if index + 1 < bins && value >= edges[index + 1] {
            index += 1;
        }
        counts[index] += 1;
    }

    Histogram {
        column: column.to_string(),
        counts,
        edges,
    }
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if values.is_empty() {
        (0.0, 1.0)
    } else if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count_rule() {
        assert_eq!(bin_count_for(0), 100);
        assert_eq!(bin_count_for(3), 100);
        assert_eq!(bin_count_for(100), 100);
        assert_eq!(bin_count_for(101), 10);
        assert_eq!(bin_count_for(1_000), 100);
        assert_eq!(bin_count_for(2_345), 234); // 234.5 rounds to even
        assert_eq!(bin_count_for(2_355), 236); // 235.5 rounds to even
    }

    #[test]
    fn test_equal_width_basic() {
        let hist = equal_width("x", &[0.0, 1.0, 2.0, 3.0, 4.0], 4);

        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // Last bin is closed, so it holds both 3 and 4
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_equal_width_counts_sum_to_values() {
        let values: Vec<f64> = (0..257).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let hist = equal_width("x", &values, 100);

        assert_eq!(hist.counts.len(), 100);
        assert_eq!(hist.edges.len(), 101);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn test_equal_width_constant_values() {
        let hist = equal_width("x", &[5.0, 5.0, 5.0], 2);

        assert_eq!(hist.edges, vec![4.5, 5.0, 5.5]);
        // 5.0 sits on the inner edge, which opens the second bin
        assert_eq!(hist.counts, vec![0, 3]);
    }

    #[test]
    fn test_equal_width_empty() {
        let hist = equal_width("x", &[], 4);

        assert_eq!(hist.edges.first(), Some(&0.0));
        assert_eq!(hist.edges.last(), Some(&1.0));
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_equal_width_extreme_range() {
        let hist = equal_width("x", &[-1e308, 0.0, 1e308], 4);

        assert!(hist.edges.iter().all(|e| e.is_finite()));
        assert!(hist.edges.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(hist.edges[0], -1e308);
        assert_eq!(hist.edges[2], 0.0);
        assert_eq!(hist.edges[4], 1e308);
        assert_eq!(hist.counts, vec![1, 0, 1, 1]);

        let hist = equal_width("x", &[f64::MIN, f64::MAX], 1);
        assert_eq!(hist.edges, vec![f64::MIN, f64::MAX]);
        assert_eq!(hist.counts, vec![2]);
    }

    #[test]
    fn test_equal_width_zero_bins_is_one_bin() {
        let hist = equal_width("x", &[1.0, 2.0], 0);
        assert_eq!(hist.counts, vec![2]);
    }
}
