//! Q3: what do the age and gender distributions look like?

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{AggregateOutcome, label_counts, numeric_series, utf8_column};
use crate::error::Result;
use crate::schema::{AGE, GENDER};

/// Number of visit records for one gender category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCount {
    /// Gender category
    pub gender: String,
    /// Number of visit records in this category
    pub count: u64,
}

/// The raw sequence of non-null ages, for downstream histogramming.
///
/// Binning is a presentation concern and happens in the chart layer.
pub fn age_series(batch: &RecordBatch) -> Result<AggregateOutcome<Vec<f64>>> {
    numeric_series(batch, AGE)
}

/// Count records per gender category, ordered descending by count with ties
/// broken by first appearance.
pub fn gender_counts(batch: &RecordBatch) -> Result<AggregateOutcome<Vec<GenderCount>>> {
    let Some(labels) = utf8_column(batch, GENDER)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };

    let counts = label_counts(&labels);
    if counts.is_empty() {
        return Ok(AggregateOutcome::Empty);
    }

    Ok(AggregateOutcome::Computed(
        counts
            .into_iter()
            .map(|(gender, count)| GenderCount { gender, count })
            .collect(),
    ))
}
