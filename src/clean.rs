//! Row cleaning for the coerced visit table.
//!
//! Cleaning never mutates its input; it produces a progressively narrower
//! view of the batch. The step order matters: the age-range test runs first,
//! then the missing-field drops, then deduplication, so each later step
//! operates on a strict subset of the previous one. Reapplying `clean_batch`
//! to its own output yields the same batch.

use arrow::array::{Array, BooleanArray, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::config::DashboardConfig;
use crate::error::{InsightsError, Result};
use crate::filter::{self, Expr};
use crate::schema::{AGE, DIAGNOSIS, PATIENT_ID, VISIT_DATE};

/// Clean a coerced batch:
///
/// 1. If the age column is present, keep rows whose age lies in the
///    configured valid range; missing ages fail the range test.
/// 2. For each of the diagnosis and visit-date columns present, drop rows
///    where the value is missing.
/// 3. Deduplicate on (`Patient_ID`, `Visit_Date`), keeping the first
///    occurrence in original order. Skipped when either key column is
///    absent.
pub fn clean_batch(batch: &RecordBatch, config: &DashboardConfig) -> Result<RecordBatch> {
    let before = batch.num_rows();
    let mut cleaned = batch.clone();

    if cleaned.schema_ref().column_with_name(AGE).is_some() {
        let (low, high) = config.valid_age_range;
        cleaned = filter::apply_expr(
            &cleaned,
            &Expr::Between {
                column: AGE.to_string(),
                low,
                high,
            },
        )?;
    }

    for column in [DIAGNOSIS, VISIT_DATE] {
        if cleaned.schema_ref().column_with_name(column).is_some() {
            cleaned = filter::apply_expr(&cleaned, &Expr::NotNull(column.to_string()))?;
        }
    }

    let cleaned = dedup_visits(&cleaned)?;

    if cleaned.num_rows() < before {
        log::debug!(
            "Cleaning dropped {} of {} rows",
            before - cleaned.num_rows(),
            before
        );
    }
    Ok(cleaned)
}

/// Keep the first row for each (`Patient_ID`, `Visit_Date`) pair.
///
/// Key components are compared in string form so the dedup works whether the
/// identifier column was read as strings or integers; null components
/// compare equal to each other.
fn dedup_visits(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let (Some((id_index, _)), Some((date_index, _))) = (
        schema.column_with_name(PATIENT_ID),
        schema.column_with_name(VISIT_DATE),
    ) else {
        return Ok(batch.clone());
    };

    let ids = key_column(batch, id_index)?;
    let dates = key_column(batch, date_index)?;

    let mut seen: FxHashSet<(Option<&str>, Option<&str>)> = FxHashSet::default();
    let mask: BooleanArray = (0..batch.num_rows())
        .map(|row| Some(seen.insert((value_at(&ids, row), value_at(&dates, row)))))
        .collect();

    filter::filter_batch(batch, &mask)
}

fn key_column(batch: &RecordBatch, index: usize) -> Result<StringArray> {
    let array = batch.column(index);
    let array = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Utf8)?
    };
    Ok(array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| InsightsError::schema("Expected StringArray for dedup key"))?
        .clone())
}

fn value_at(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}
