//! Cleaning-stage behavior: age range, missing-value drops, deduplication.

mod common;

use common::{prepared, string_col};
use visit_insights::config::DashboardConfig;
use visit_insights::{clean_batch, coerce_batch};

#[test]
fn cleaning_keeps_valid_rows_untouched() {
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("2")]),
        ("Visit_Date", &[Some("2024-01-05"), Some("2024-02-10")]),
        ("Diagnosis", &[Some("Anxiety"), Some("Depression")]),
        ("Age", &[Some("34"), Some("45")]),
    ]);
    assert_eq!(cleaned.num_rows(), 2);
}

#[test]
fn out_of_range_ages_are_dropped() {
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("2"), Some("3")]),
        (
            "Visit_Date",
            &[Some("2024-01-05"), Some("2024-01-06"), Some("2024-01-07")],
        ),
        ("Diagnosis", &[Some("Anxiety"), Some("Anxiety"), Some("PTSD")]),
        ("Age", &[Some("34"), Some("150"), Some("-3")]),
    ]);
    assert_eq!(cleaned.num_rows(), 1);
    assert_eq!(string_col(&cleaned, "Patient_ID").value(0), "1");
}

#[test]
fn unparsable_age_fails_the_range_test() {
    // Coercion turns "unknown" into null; the range predicate then drops it
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("2")]),
        ("Visit_Date", &[Some("2024-01-05"), Some("2024-01-06")]),
        ("Diagnosis", &[Some("Anxiety"), Some("Anxiety")]),
        ("Age", &[Some("unknown"), Some("45")]),
    ]);
    assert_eq!(cleaned.num_rows(), 1);
    assert_eq!(string_col(&cleaned, "Patient_ID").value(0), "2");
}

#[test]
fn rows_missing_diagnosis_or_visit_date_are_dropped() {
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("2"), Some("3"), Some("4")]),
        (
            "Visit_Date",
            &[
                Some("2024-01-05"),
                None,
                Some("2024-01-07"),
                Some("not a date"),
            ],
        ),
        (
            "Diagnosis",
            &[Some("Anxiety"), Some("PTSD"), None, Some("Depression")],
        ),
    ]);
    assert_eq!(cleaned.num_rows(), 1);
    assert_eq!(string_col(&cleaned, "Patient_ID").value(0), "1");
}

#[test]
fn duplicate_visits_keep_the_first_occurrence() {
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("1"), Some("1")]),
        (
            "Visit_Date",
            &[Some("2024-01-05"), Some("2024-01-05"), Some("2024-01-06")],
        ),
        (
            "Diagnosis",
            &[Some("Anxiety"), Some("Depression"), Some("Anxiety")],
        ),
    ]);
    assert_eq!(cleaned.num_rows(), 2);
    // The first row of the duplicate pair survives with its own diagnosis
    assert_eq!(string_col(&cleaned, "Diagnosis").value(0), "Anxiety");
}

#[test]
fn same_date_different_patients_are_not_duplicates() {
    let cleaned = prepared(&[
        ("Patient_ID", &[Some("1"), Some("2")]),
        ("Visit_Date", &[Some("2024-01-05"), Some("2024-01-05")]),
        ("Diagnosis", &[Some("Anxiety"), Some("Anxiety")]),
    ]);
    assert_eq!(cleaned.num_rows(), 2);
}

#[test]
fn dedup_is_skipped_without_a_patient_id_column() {
    let cleaned = prepared(&[
        ("Visit_Date", &[Some("2024-01-05"), Some("2024-01-05")]),
        ("Diagnosis", &[Some("Anxiety"), Some("Anxiety")]),
    ]);
    assert_eq!(cleaned.num_rows(), 2);
}

#[test]
fn cleaning_handles_absent_expected_columns() {
    let cleaned = prepared(&[("Notes", &[Some("follow-up"), None])]);
    assert_eq!(cleaned.num_rows(), 2);
}

#[test]
fn cleaning_is_idempotent() {
    let config = DashboardConfig::default();
    let once = prepared(&[
        ("Patient_ID", &[Some("1"), Some("1"), Some("2"), Some("3")]),
        (
            "Visit_Date",
            &[
                Some("2024-01-05"),
                Some("2024-01-05"),
                None,
                Some("2024-01-07"),
            ],
        ),
        (
            "Diagnosis",
            &[Some("Anxiety"), Some("Anxiety"), Some("PTSD"), None],
        ),
        ("Age", &[Some("34"), Some("34"), Some("45"), Some("52")]),
    ]);
    let twice = clean_batch(&once, &config).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn cleaning_never_increases_the_row_count() {
    let config = DashboardConfig::default();
    let raw = common::raw_batch(&[
        ("Patient_ID", &[Some("1"), Some("2"), Some("3")]),
        (
            "Visit_Date",
            &[Some("2024-01-05"), Some("garbage"), Some("2024-01-07")],
        ),
        ("Diagnosis", &[Some("Anxiety"), Some("PTSD"), Some("PTSD")]),
    ]);
    let coerced = coerce_batch(&raw, &config).unwrap();
    let cleaned = clean_batch(&coerced, &config).unwrap();
    assert!(cleaned.num_rows() <= raw.num_rows());
}

#[test]
fn integer_typed_patient_ids_deduplicate() {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;

    let schema = Schema::new(vec![
        Field::new("Patient_ID", DataType::Int64, true),
        Field::new("Visit_Date", DataType::Utf8, true),
        Field::new("Diagnosis", DataType::Utf8, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![Some(7), Some(7)])) as ArrayRef,
            Arc::new(StringArray::from(vec![
                Some("2024-01-05"),
                Some("2024-01-05"),
            ])) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("Anxiety"), Some("Anxiety")])) as ArrayRef,
        ],
    )
    .unwrap();

    let config = DashboardConfig::default();
    let cleaned = clean_batch(&coerce_batch(&batch, &config).unwrap(), &config).unwrap();
    assert_eq!(cleaned.num_rows(), 1);
}
