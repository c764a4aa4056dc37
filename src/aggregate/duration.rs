//! Q4: how does treatment duration differ by diagnosis?

use std::cmp::Ordering;
use std::collections::hash_map::Entry;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::aggregate::{AggregateOutcome, float64_column, utf8_column};
use crate::error::Result;
use crate::schema::{DIAGNOSIS, TREATMENT_DURATION_WEEKS};

/// Mean treatment duration for one diagnosis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationByDiagnosis {
    /// Diagnosis label
    pub diagnosis: String,
    /// Arithmetic mean of treatment duration, in weeks
    pub mean_weeks: f64,
}

/// Mean treatment duration per diagnosis, ordered descending by mean.
///
/// Missing durations are skipped from the mean, so a diagnosis whose
/// durations are all missing does not appear at all. Equal means keep the
/// order in which their diagnoses first appear in the batch.
pub fn duration_by_diagnosis(
    batch: &RecordBatch,
) -> Result<AggregateOutcome<Vec<DurationByDiagnosis>>> {
    let Some(labels) = utf8_column(batch, DIAGNOSIS)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };
    let Some(weeks) = float64_column(batch, TREATMENT_DURATION_WEEKS)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<(&str, f64, u64)> = Vec::new();

    for row in 0..batch.num_rows() {
        if labels.is_null(row) || weeks.is_null(row) {
            continue;
        }
        let label = labels.value(row);
        let duration = weeks.value(row);
        match index.entry(label) {
            Entry::Occupied(entry) => {
                let group = &mut groups[*entry.get()];
                group.1 += duration;
                group.2 += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                groups.push((label, duration, 1));
            }
        }
    }

    if groups.is_empty() {
        return Ok(AggregateOutcome::Empty);
    }

    let mut means: Vec<DurationByDiagnosis> = groups
        .into_iter()
        .map(|(label, sum, count)| DurationByDiagnosis {
            diagnosis: label.to_string(),
            mean_weeks: sum / count as f64,
        })
        .collect();
    means.sort_by(|a, b| {
        b.mean_weeks
            .partial_cmp(&a.mean_weeks)
            .unwrap_or(Ordering::Equal)
    });

    Ok(AggregateOutcome::Computed(means))
}
