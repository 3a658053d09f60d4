//! Shared utilities for the report pipeline.
//!
//! Dtype categories, missing-value masks and value extraction used by the
//! profiler and the visualizer alike.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for profiling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String, categorical or enum type
    Text,
    /// Other/unknown types
    Other,
}

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

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

/// Check if a DataType holds text or enumerated labels.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String | DataType::Categorical(..) | DataType::Enum(..)
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if is_text_dtype(dtype) {
        DtypeCategory::Text
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Missing Values
// =============================================================================

/// Cell contents treated as missing when parsing delimited text.
pub const MISSING_MARKERS: [&str; 15] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "#NA", "<NA>", "#N/A N/A",
];

/// Per-row missing flags of a Series.
///
/// Nulls are missing for every dtype; float columns additionally treat NaN
/// as missing.
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    if series.dtype().is_float() {
        let floats = series.cast(&DataType::Float64)?;
        Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect())
    } else {
        Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect())
    }
}

/// Count missing cells in a Series.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|m| *m).count())
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Present numeric values of a Series as f64, skipping nulls and NaN.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Numeric values of a Series aligned by row, with missing cells as `None`.
pub fn optional_numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Frequency of each distinct present value, most frequent first.
///
/// Ties are ordered by value so repeated runs produce the same order.
pub fn category_counts(series: &Series) -> PolarsResult<Vec<(String, usize)>> {
    let strings = series.cast(&DataType::String)?;

    let mut value_counts: HashMap<String, usize> = HashMap::new();
    for val in strings.str()?.into_iter().flatten() {
        *value_counts.entry(val.to_string()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = value_counts.into_iter().collect();
    counts.sort_by(|(a_val, a_count), (b_val, b_count)| {
        b_count.cmp(a_count).then_with(|| a_val.cmp(b_val))
    });
    Ok(counts)
}

// =============================================================================
// File Names
// =============================================================================

/// Characters that cannot appear in a file name on common filesystems.
const RESERVED_FILE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a column name safe to embed in a file name.
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if RESERVED_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// Tests
// =============================================================================
