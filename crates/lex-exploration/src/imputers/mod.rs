//! Imputation module for filling missing numeric values.
//!
//! Provides statistical imputation (mean, median) over the numeric columns
//! whose missing percentage stays under a threshold.

mod statistical;

pub use statistical::StatisticalImputer;
