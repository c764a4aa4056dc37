//! Q1: which diagnoses are most common?

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{AggregateOutcome, label_counts, utf8_column};
use crate::error::Result;
use crate::schema::DIAGNOSIS;

/// Number of visit records carrying one diagnosis label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisCount {
    /// Diagnosis label
    pub diagnosis: String,
    /// Number of visit records with this diagnosis
    pub visits: u64,
}

/// Count visit records per diagnosis, ordered descending by count.
///
/// Ties are broken by first appearance in the batch.
pub fn diagnosis_counts(batch: &RecordBatch) -> Result<AggregateOutcome<Vec<DiagnosisCount>>> {
    let Some(labels) = utf8_column(batch, DIAGNOSIS)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };

    let counts = label_counts(&labels);
    if counts.is_empty() {
        return Ok(AggregateOutcome::Empty);
    }

    Ok(AggregateOutcome::Computed(
        counts
            .into_iter()
            .map(|(diagnosis, visits)| DiagnosisCount { diagnosis, visits })
            .collect(),
    ))
}
