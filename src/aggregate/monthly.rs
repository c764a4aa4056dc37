//! Q2: how does visit volume move over time?

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::aggregate::{AggregateOutcome, date32_column};
use crate::error::Result;
use crate::schema::VISIT_DATE;
use crate::schema::dates::date_from_days;

/// Number of visits falling in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyVisits {
    /// First day of the month
    pub month: NaiveDate,
    /// Number of visits in that month
    pub visits: u64,
}

/// Bucket visits by calendar month, ordered ascending by month.
///
/// Each visit date maps to the first day of its month. Rows with a null
/// visit date are excluded from the buckets even when they survived upstream
/// filtering, so the bucket counts always sum to the number of rows with a
/// valid date.
pub fn monthly_visits(batch: &RecordBatch) -> Result<AggregateOutcome<Vec<MonthlyVisits>>> {
    let Some(dates) = date32_column(batch, VISIT_DATE)? else {
        return Ok(AggregateOutcome::ColumnMissing);
    };

    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for days in dates.iter().flatten() {
        if let Some(month) = date_from_days(days).and_then(|date| date.with_day(1)) {
            *buckets.entry(month).or_insert(0) += 1;
        }
    }

    if buckets.is_empty() {
        return Ok(AggregateOutcome::Empty);
    }

    Ok(AggregateOutcome::Computed(
        buckets
            .into_iter()
            .map(|(month, visits)| MonthlyVisits { month, visits })
            .collect(),
    ))
}
