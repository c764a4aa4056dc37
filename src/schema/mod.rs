//! Expected columns of the patient-visit table and type coercion.
//!
//! The source CSV is free to omit any column and to carry unparsable values.
//! Coercion normalizes every *present* expected column to its target type,
//! turning values that fail to parse into nulls rather than raising; columns
//! outside the expected set pass through untouched.

pub mod dates;

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::config::{DashboardConfig, DateFormatConfig};
use crate::error::{InsightsError, Result};
use crate::schema::dates::{days_from_date, parse_date_string};

/// Patient identifier column
pub const PATIENT_ID: &str = "Patient_ID";
/// Visit timestamp column
pub const VISIT_DATE: &str = "Visit_Date";
/// Diagnosis label column
pub const DIAGNOSIS: &str = "Diagnosis";
/// Patient age column
pub const AGE: &str = "Age";
/// Gender category column
pub const GENDER: &str = "Gender";
/// Treatment duration column, in weeks
pub const TREATMENT_DURATION_WEEKS: &str = "Treatment_Duration_Weeks";
/// Visit count column
pub const NUM_VISITS: &str = "Num_Visits";
/// Satisfaction score column, expected domain 1..=5
pub const SATISFACTION_SCORE: &str = "Satisfaction_Score";
/// Severity level column
pub const SEVERITY_LEVEL: &str = "Severity_Level";

/// Columns coerced to Float64 when present
pub const NUMERIC_COLUMNS: [&str; 5] = [
    AGE,
    TREATMENT_DURATION_WEEKS,
    NUM_VISITS,
    SATISFACTION_SCORE,
    SEVERITY_LEVEL,
];

/// Coerce every present expected column of `batch` to its target type.
///
/// Numeric columns become Float64 and `Visit_Date` becomes Date32; values
/// that fail to parse become null. Absent expected columns are not an error,
/// and unexpected columns pass through unchanged. The input batch is never
/// mutated. Coercing an already-coerced batch is a per-column no-op.
pub fn coerce_batch(batch: &RecordBatch, config: &DashboardConfig) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let (array, data_type) = match target_type(field.name()) {
            Some(DataType::Float64) => (coerce_numeric(column)?, DataType::Float64),
            Some(DataType::Date32) => (
                coerce_date(column, &config.date_format_config)?,
                DataType::Date32,
            ),
            _ => (column.clone(), field.data_type().clone()),
        };

        if config.log_coercions && &data_type != field.data_type() {
            log::debug!(
                "Coerced column '{}' from {:?} to {:?}",
                field.name(),
                field.data_type(),
                data_type
            );
        }

        fields.push(Field::new(field.name(), data_type, true));
        columns.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

/// Target type for an expected column, `None` for pass-through columns
#[must_use]
pub fn target_type(column: &str) -> Option<DataType> {
    if column == VISIT_DATE {
        Some(DataType::Date32)
    } else if NUMERIC_COLUMNS.contains(&column) {
        Some(DataType::Float64)
    } else {
        None
    }
}

/// Convert a column to Float64, parsing strings value by value
fn coerce_numeric(array: &ArrayRef) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Float64 => Ok(array.clone()),
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| InsightsError::schema("Expected StringArray"))?;

            let mut builder = Float64Array::builder(strings.len());
            for i in 0..strings.len() {
                if strings.is_null(i) {
                    builder.append_null();
                    continue;
                }
                match strings.value(i).trim().parse::<f64>() {
                    Ok(value) => builder.append_value(value),
                    // Unparsable values degrade to missing
                    Err(_) => builder.append_null(),
                }
            }
            Ok(Arc::new(builder.finish()) as ArrayRef)
        }
        // Arrow's cast is safe by default: invalid values become null
        _ => cast::cast(array, &DataType::Float64).map_err(Into::into),
    }
}

/// Convert a column to Date32, parsing strings with the configured formats
fn coerce_date(array: &ArrayRef, date_config: &DateFormatConfig) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Date32 => Ok(array.clone()),
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| InsightsError::schema("Expected StringArray"))?;

            let mut builder = Date32Array::builder(strings.len());
            for i in 0..strings.len() {
                if strings.is_null(i) {
                    builder.append_null();
                    continue;
                }
                match parse_date_string(strings.value(i), date_config) {
                    Some(date) => builder.append_value(days_from_date(date)),
                    None => builder.append_null(),
                }
            }
            Ok(Arc::new(builder.finish()) as ArrayRef)
        }
        _ => cast::cast(array, &DataType::Date32).map_err(Into::into),
    }
}
