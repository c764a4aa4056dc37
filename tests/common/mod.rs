//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use visit_insights::config::DashboardConfig;
use visit_insights::{clean_batch, coerce_batch};

/// Build a batch of raw string columns, the shape an un-coerced upload has.
pub fn raw_batch(columns: &[(&str, &[Option<&str>])]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(StringArray::from(values.to_vec())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

/// Raw columns run through schema coercion with the default config.
pub fn coerced(columns: &[(&str, &[Option<&str>])]) -> RecordBatch {
    coerce_batch(&raw_batch(columns), &DashboardConfig::default()).unwrap()
}

/// Raw columns run through coercion and cleaning with the default config.
pub fn prepared(columns: &[(&str, &[Option<&str>])]) -> RecordBatch {
    clean_batch(&coerced(columns), &DashboardConfig::default()).unwrap()
}

/// Downcast a column to a `StringArray`.
pub fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> &'a StringArray {
    let index = batch.schema_ref().index_of(name).unwrap();
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
}

/// Downcast a column to a `Float64Array`.
pub fn float_col<'a>(batch: &'a RecordBatch, name: &str) -> &'a arrow::array::Float64Array {
    let index = batch.schema_ref().index_of(name).unwrap();
    batch
        .column(index)
        .as_any()
        .downcast_ref::<arrow::array::Float64Array>()
        .unwrap()
}
