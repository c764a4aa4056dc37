//! A reusable record-batch filter engine for the interactive controls.
//!
//! The dashboard's three controls (age range, gender multi-select, diagnosis
//! multi-select) compose as an AND of independent boolean predicates; the
//! cleaning stage reuses the same expressions for its range and missing-value
//! masks. Null values propagate to null in every comparison and are dropped
//! by the mask filter, so a row with a missing age never survives an
//! age-range predicate.

use std::collections::HashSet;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::compute::kernels::cmp::{gt_eq, lt_eq};
use arrow::compute::{and, filter as filter_array, is_not_null};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};
use crate::schema::{AGE, DIAGNOSIS, GENDER};

/// A filter expression evaluated against a record batch
#[derive(Debug, Clone)]
pub enum Expr {
    /// Numeric column lies in the inclusive range [low, high]
    Between {
        /// Column to test
        column: String,
        /// Inclusive lower bound
        low: f64,
        /// Inclusive upper bound
        high: f64,
    },
    /// String column value is a member of the given set
    InSet {
        /// Column to test
        column: String,
        /// Accepted values
        values: Vec<String>,
    },
    /// Column value is not null
    NotNull(String),
    /// Logical AND of expressions
    And(Vec<Expr>),
    /// Always evaluates to true
    AlwaysTrue,
}

impl Expr {
    /// Combine with another expression under a logical AND
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        match self {
            Self::And(mut exprs) => {
                exprs.push(rhs);
                Self::And(exprs)
            }
            other => Self::And(vec![other, rhs]),
        }
    }

    /// Returns the set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Between { column, .. } | Self::InSet { column, .. } => {
                columns.insert(column.clone());
            }
            Self::NotNull(column) => {
                columns.insert(column.clone());
            }
            Self::And(exprs) => {
                for expr in exprs {
                    expr.collect_columns(columns);
                }
            }
            Self::AlwaysTrue => {}
        }
    }
}

/// Evaluate a filter expression against a record batch, producing a boolean
/// mask with one entry per row.
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),

        Expr::And(exprs) => {
            let mut mask = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                mask = and(&mask, &evaluate_expr(batch, expr)?)?;
            }
            Ok(mask)
        }

        Expr::NotNull(column) => {
            let array = column_by_name(batch, column)?;
            Ok(is_not_null(array.as_ref())?)
        }

        Expr::Between { column, low, high } => {
            let values = numeric_values(batch, column)?;
            let lower = gt_eq(&values, &Float64Array::new_scalar(*low))?;
            let upper = lt_eq(&values, &Float64Array::new_scalar(*high))?;
            Ok(and(&lower, &upper)?)
        }

        Expr::InSet { column, values } => {
            let labels = utf8_values(batch, column)?;
            let value_set: HashSet<&str> = values.iter().map(String::as_str).collect();
            Ok(labels
                .iter()
                .map(|opt| opt.map(|s| value_set.contains(s)))
                .collect())
        }
    }
}

/// Evaluate an expression and keep only the rows where it holds.
pub fn apply_expr(batch: &RecordBatch, expr: &Expr) -> Result<RecordBatch> {
    let mask = evaluate_expr(batch, expr)?;
    filter_batch(batch, &mask)
}

/// Filter a record batch based on a boolean mask.
pub fn filter_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(InsightsError::filter(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| filter_array(col.as_ref(), mask))
        .collect::<arrow::error::Result<_>>()?;

    RecordBatch::try_new(batch.schema(), filtered_columns).map_err(Into::into)
}

fn column_by_name<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let index = batch
        .schema_ref()
        .index_of(name)
        .map_err(|_| InsightsError::filter(format!("Column '{name}' not found in batch")))?;
    Ok(batch.column(index))
}

fn numeric_values(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let array = column_by_name(batch, name)?;
    let array = if array.data_type() == &DataType::Float64 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Float64)
            .map_err(|e| InsightsError::filter(format!("Column '{name}' is not numeric: {e}")))?
    };
    Ok(array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| InsightsError::filter(format!("Column '{name}' is not numeric")))?
        .clone())
}

fn utf8_values(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let array = column_by_name(batch, name)?;
    let array = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Utf8)
            .map_err(|e| InsightsError::filter(format!("Column '{name}' is not a string column: {e}")))?
    };
    Ok(array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| InsightsError::filter(format!("Column '{name}' is not a string column")))?
        .clone())
}

/// The state of the dashboard's three interactive controls.
///
/// `None` (or an empty selection list) means "no constraint". A predicate
/// whose column is absent from the table becomes a no-op rather than an
/// error, mirroring how each control only appears when its column exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Inclusive (min, max) from the age slider
    pub age_range: Option<(f64, f64)>,
    /// Selected gender values from the multi-select
    pub genders: Option<Vec<String>>,
    /// Selected diagnosis values from the multi-select
    pub diagnoses: Option<Vec<String>>,
}

impl FilterSelection {
    /// Compose the active controls into a single AND expression against the
    /// given schema.
    #[must_use]
    pub fn to_expr(&self, schema: &Schema) -> Expr {
        let mut parts = Vec::new();

        if let Some((low, high)) = self.age_range {
            if schema.column_with_name(AGE).is_some() {
                parts.push(Expr::Between {
                    column: AGE.to_string(),
                    low,
                    high,
                });
            }
        }

        if let Some(genders) = &self.genders {
            if !genders.is_empty() && schema.column_with_name(GENDER).is_some() {
                parts.push(Expr::InSet {
                    column: GENDER.to_string(),
                    values: genders.clone(),
                });
            }
        }

        if let Some(diagnoses) = &self.diagnoses {
            if !diagnoses.is_empty() && schema.column_with_name(DIAGNOSIS).is_some() {
                parts.push(Expr::InSet {
                    column: DIAGNOSIS.to_string(),
                    values: diagnoses.clone(),
                });
            }
        }

        if parts.is_empty() {
            Expr::AlwaysTrue
        } else {
            Expr::And(parts)
        }
    }
}
