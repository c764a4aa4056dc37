//! The five dashboard aggregators.
//!
//! Every aggregator is a pure function of its input batch. There is no error
//! path for degraded data: an absent source column yields
//! [`AggregateOutcome::ColumnMissing`], a column with no usable values yields
//! [`AggregateOutcome::Empty`], and both render as an informational message
//! downstream. A missing column in one aggregator never affects another.
//! `Err` is reserved for genuine schema faults.

mod demographics;
mod diagnosis;
mod duration;
mod monthly;
mod satisfaction;

pub use demographics::{GenderCount, age_series, gender_counts};
pub use diagnosis::{DiagnosisCount, diagnosis_counts};
pub use duration::{DurationByDiagnosis, duration_by_diagnosis};
pub use monthly::{MonthlyVisits, monthly_visits};
pub use satisfaction::satisfaction_series;

use std::collections::hash_map::Entry;

use arrow::array::{Array, Date32Array, Float64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{InsightsError, Result};

/// Result of one aggregator: a computed view, or a "no data" sentinel.
///
/// The two sentinel cases are deliberately distinguishable so the
/// presentation layer can say *why* a view is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AggregateOutcome<T> {
    /// The aggregate was computed from at least one usable value
    Computed(T),
    /// The source column exists but holds no usable values
    Empty,
    /// A required source column is absent from the table
    ColumnMissing,
}

impl<T> AggregateOutcome<T> {
    /// Returns the computed value, if any
    #[must_use]
    pub const fn computed(&self) -> Option<&T> {
        match self {
            Self::Computed(value) => Some(value),
            _ => None,
        }
    }

    /// True when this outcome carries a computed aggregate
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// True for either "no data" sentinel
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::Empty | Self::ColumnMissing)
    }
}

/// Look up a column as a string array, `Ok(None)` when absent
pub(crate) fn utf8_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>> {
    let Some((index, _)) = batch.schema_ref().column_with_name(name) else {
        return Ok(None);
    };
    let array = batch.column(index);
    let array = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Utf8)?
    };
    Ok(Some(
        array
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| InsightsError::schema(format!("Column '{name}' is not a string column")))?
            .clone(),
    ))
}

/// Look up a column as a Float64 array, `Ok(None)` when absent
pub(crate) fn float64_column(batch: &RecordBatch, name: &str) -> Result<Option<Float64Array>> {
    let Some((index, _)) = batch.schema_ref().column_with_name(name) else {
        return Ok(None);
    };
    let array = batch.column(index);
    let array = if array.data_type() == &DataType::Float64 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Float64)?
    };
    Ok(Some(
        array
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| InsightsError::schema(format!("Column '{name}' is not numeric")))?
            .clone(),
    ))
}

/// Look up a column as a Date32 array, `Ok(None)` when absent
pub(crate) fn date32_column(batch: &RecordBatch, name: &str) -> Result<Option<Date32Array>> {
    let Some((index, _)) = batch.schema_ref().column_with_name(name) else {
        return Ok(None);
    };
    let array = batch.column(index);
    let array = if array.data_type() == &DataType::Date32 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Date32)?
    };
    Ok(Some(
        array
            .as_any()
            .downcast_ref::<Date32Array>()
            .ok_or_else(|| InsightsError::schema(format!("Column '{name}' is not a date column")))?
            .clone(),
    ))
}

/// Count occurrences of each non-null label, ordered descending by count.
/// Ties keep first-appearance order: the group table remembers insertion
/// order and the final sort is stable.
pub(crate) fn label_counts(labels: &StringArray) -> Vec<(String, u64)> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<(&str, u64)> = Vec::new();

    for label in labels.iter().flatten() {
        match index.entry(label) {
            Entry::Occupied(entry) => groups[*entry.get()].1 += 1,
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                groups.push((label, 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

/// Collect the non-null values of a numeric column.
pub(crate) fn numeric_series(batch: &RecordBatch, name: &str) -> Result<AggregateOutcome<Vec<f64>>> {
    let Some(values) = float64_column(batch, name)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };
    let series: Vec<f64> = values.iter().flatten().collect();
    if series.is_empty() {
        return Ok(AggregateOutcome::Empty);
    }
    Ok(AggregateOutcome::Computed(series))
}
