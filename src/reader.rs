//! CSV ingestion for the uploaded visit dataset.
//!
//! The upload arrives as one CSV with a header row; the schema is inferred
//! over a sample, then the whole file is read and concatenated into a single
//! `RecordBatch` for the session.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;

use crate::config::DashboardConfig;
use crate::error::Result;

/// Read a CSV file into a single record batch.
pub fn read_csv(path: &Path, config: &DashboardConfig) -> Result<RecordBatch> {
    log::info!("Reading visit data from {}", path.display());
    let file = File::open(path)?;
    let batch = read_csv_from(file, config)?;
    log::info!(
        "Loaded {} rows with {} columns from {}",
        batch.num_rows(),
        batch.num_columns(),
        path.display()
    );
    Ok(batch)
}

/// Read CSV data from any seekable source (e.g. an upload buffer) into a
/// single record batch.
///
/// A file containing only a header row yields an empty batch, not an error.
pub fn read_csv_from<R: Read + Seek>(mut input: R, config: &DashboardConfig) -> Result<RecordBatch> {
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut input, Some(config.schema_sample_rows))?;
    input.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(config.batch_size)
        .build(input)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    Ok(concat_batches(&schema, &batches)?)
}
