//! Q5: how are satisfaction scores distributed?

use arrow::record_batch::RecordBatch;

use crate::aggregate::{AggregateOutcome, numeric_series};
use crate::error::Result;
use crate::schema::SATISFACTION_SCORE;

/// The raw sequence of non-null satisfaction scores.
///
/// Scores are expected in 1..=5 but the aggregator does not re-validate the
/// domain; that belongs to upstream coercion if desired.
pub fn satisfaction_series(batch: &RecordBatch) -> Result<AggregateOutcome<Vec<f64>>> {
    numeric_series(batch, SATISFACTION_SCORE)
}
