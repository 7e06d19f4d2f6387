//! Shared utilities for profiling and imputation.
//!
//! This module contains helper functions used across modules to classify
//! columns, extract numeric values and convert cells for display.

use std::cmp::Ordering;
use std::collections::HashSet;

use polars::prelude::*;
use serde_json::{Number, Value};

use crate::types::ColumnKind;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[inline]
fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Non-text scalar types that read as numbers through their physical
/// representation.
#[inline]
fn is_numeric_like_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::Null
            | DataType::Date
            | DataType::Datetime(..)
            | DataType::Duration(..)
            | DataType::Time
    )
}

/// Declared kind of a column based on its data type.
///
/// Text and object-like values (strings, categoricals, nested and binary
/// data) are categorical; every other scalar type is numeric.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) || is_numeric_like_dtype(dtype) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

// =============================================================================
// Missing Values
// =============================================================================

/// Count missing entries: nulls, plus NaN in float columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series.null_count());
    }
    let values = numeric_values(series)?;
    Ok(values.iter().filter(|v| v.is_none()).count())
}

/// Missing entries as a percentage of `row_count`; 0 for an empty table.
pub fn missing_percentage(missing: usize, row_count: usize) -> f64 {
    if row_count == 0 {
        0.0
    } else {
        missing as f64 / row_count as f64 * 100.0
    }
}

// =============================================================================
// Numeric Extraction
// =============================================================================

/// Cast a numeric series to f64 values, mapping NaN to `None`.
///
/// Booleans read as 0/1 and temporal values as their physical integer.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.to_physical_repr().cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing values of a numeric series, in row order.
pub fn present_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Sort f64 values in ascending order. Inputs never contain NaN.
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Quantile of sorted values with linear interpolation between ranks.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(values[lower]);
    }
    let weight = pos - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * weight)
}

/// Number of distinct values.
pub fn distinct_values(values: &[f64]) -> usize {
    values
        .iter()
        // -0.0 and 0.0 are the same value
        .map(|v| if *v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
        .collect::<HashSet<u64>>()
        .len()
}

// =============================================================================
// Display Conversion
// =============================================================================

/// Converts a Polars `AnyValue` to a JSON `Value`.
///
/// NaN and infinite floats become `null`; temporal, list and other complex
/// values are stringified with `Display`.
pub fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Number(i.into()),
        AnyValue::Int16(i) => Value::Number(i.into()),
        AnyValue::Int32(i) => Value::Number(i.into()),
        AnyValue::Int64(i) => Value::Number(i.into()),
        AnyValue::UInt8(u) => Value::Number(u.into()),
        AnyValue::UInt16(u) => Value::Number(u.into()),
        AnyValue::UInt32(u) => Value::Number(u.into()),
        AnyValue::UInt64(u) => Value::Number(u.into()),

        AnyValue::Float32(f) => Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Float64(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),

        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),

        _ => Value::String(format!("{}", value)),
    }
}

/// The first `count` rows of `df` as JSON cells, row-major.
pub fn head_rows(df: &DataFrame, count: usize) -> Vec<Vec<Value>> {
    let sliced = df.head(Some(count));
    let mut rows = Vec::with_capacity(sliced.height());

    for row_idx in 0..sliced.height() {
        let row = sliced
            .get_columns()
            .iter()
            .map(|col| col.get(row_idx).ok().map_or(Value::Null, any_value_to_json))
            .collect();
        rows.push(row);
    }

    rows
}
