//! Session context and the per-interaction recomputation pass.
//!
//! The hosting framework re-runs its whole page on every interaction; the
//! equivalent here is one explicit, pure pass: [`render`] applies the current
//! filter selection to the cleaned table and recomputes all five views. The
//! [`Session`] is the request-scoped context holding the uploaded table; no
//! process-wide state is involved.

mod summary;

use std::io::{Read, Seek};
use std::path::Path;

use arrow::record_batch::RecordBatch;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::aggregate::{
    AggregateOutcome, DiagnosisCount, DurationByDiagnosis, GenderCount, MonthlyVisits, age_series,
    diagnosis_counts, duration_by_diagnosis, float64_column, gender_counts, monthly_visits,
    satisfaction_series, utf8_column,
};
use crate::clean::clean_batch;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::{FilterSelection, apply_expr};
use crate::reader::{read_csv, read_csv_from};
use crate::schema::{AGE, DIAGNOSIS, GENDER, coerce_batch};

/// One uploaded dataset: the raw table as read, the coerced and cleaned
/// table every interaction recomputes from, and the seeded filter options.
///
/// Dropped when the user uploads a new file or the session ends; nothing is
/// persisted.
#[derive(Debug, Clone)]
pub struct Session {
    raw: RecordBatch,
    cleaned: RecordBatch,
    options: FilterOptions,
    config: DashboardConfig,
}

impl Session {
    /// Load a CSV file and prepare it for rendering.
    pub fn from_path(path: impl AsRef<Path>, config: DashboardConfig) -> Result<Self> {
        let raw = read_csv(path.as_ref(), &config)?;
        Self::from_batch(raw, config)
    }

    /// Load CSV data from a seekable source, e.g. an upload buffer.
    pub fn from_reader<R: Read + Seek>(input: R, config: DashboardConfig) -> Result<Self> {
        let raw = read_csv_from(input, &config)?;
        Self::from_batch(raw, config)
    }

    /// Coerce and clean an already-read batch and seed the filter options.
    pub fn from_batch(raw: RecordBatch, config: DashboardConfig) -> Result<Self> {
        let cleaned = clean_batch(&coerce_batch(&raw, &config)?, &config)?;
        let options = seed_filter_options(&cleaned)?;
        log::info!(
            "Session ready: {} raw rows, {} after cleaning",
            raw.num_rows(),
            cleaned.num_rows()
        );
        Ok(Self {
            raw,
            cleaned,
            options,
            config,
        })
    }

    /// The table exactly as read from the upload
    #[must_use]
    pub const fn raw(&self) -> &RecordBatch {
        &self.raw
    }

    /// The coerced, cleaned table all views derive from
    #[must_use]
    pub const fn cleaned(&self) -> &RecordBatch {
        &self.cleaned
    }

    /// Filter control options seeded from the cleaned data
    #[must_use]
    pub const fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// The configuration the session was loaded with
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Recompute all views for the given filter selection.
    pub fn render(&self, selection: &FilterSelection) -> Result<DashboardViews> {
        render(&self.cleaned, selection)
    }
}

/// Values seeding the interactive controls: slider bounds from the data and
/// the sorted distinct sets backing the two multi-selects (defaults = all
/// present values).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// (min, max) age present in the cleaned data, `None` when no ages exist
    pub age_bounds: Option<(f64, f64)>,
    /// Sorted distinct gender values
    pub genders: Vec<String>,
    /// Sorted distinct diagnosis values
    pub diagnoses: Vec<String>,
}

/// Seed the filter controls from a cleaned batch.
pub fn seed_filter_options(batch: &RecordBatch) -> Result<FilterOptions> {
    let age_bounds = match float64_column(batch, AGE)? {
        Some(ages) => match ages.iter().flatten().minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(age) => Some((age, age)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        },
        None => None,
    };

    Ok(FilterOptions {
        age_bounds,
        genders: distinct_labels(batch, GENDER)?,
        diagnoses: distinct_labels(batch, DIAGNOSIS)?,
    })
}

fn distinct_labels(batch: &RecordBatch, name: &str) -> Result<Vec<String>> {
    Ok(match utf8_column(batch, name)? {
        Some(labels) => labels
            .iter()
            .flatten()
            .unique()
            .map(ToOwned::to_owned)
            .sorted()
            .collect(),
        None => Vec::new(),
    })
}

/// One dashboard question: the aggregate outcome plus the interpretation
/// sentence derived from its extreme value, when there is data to interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView<T> {
    /// Computed aggregate or "no data" sentinel
    pub outcome: AggregateOutcome<T>,
    /// Natural-language reading of the aggregate's extreme value
    pub interpretation: Option<String>,
}

/// All five views recomputed for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    /// Rows surviving the current filter selection
    pub filtered_rows: usize,
    /// Q1: visit counts per diagnosis
    pub diagnoses: QuestionView<Vec<DiagnosisCount>>,
    /// Q2: visit volume per calendar month
    pub monthly_visits: QuestionView<Vec<MonthlyVisits>>,
    /// Q3a: raw ages for histogramming
    pub ages: QuestionView<Vec<f64>>,
    /// Q3b: record counts per gender
    pub gender_breakdown: QuestionView<Vec<GenderCount>>,
    /// Q4: mean treatment duration per diagnosis
    pub duration_by_diagnosis: QuestionView<Vec<DurationByDiagnosis>>,
    /// Q5: raw satisfaction scores
    pub satisfaction_scores: QuestionView<Vec<f64>>,
}

/// One full recomputation pass: apply the filter selection, run all five
/// aggregators and derive the interpretation sentences.
///
/// Pure with respect to `batch`; every call is independent.
pub fn render(batch: &RecordBatch, selection: &FilterSelection) -> Result<DashboardViews> {
    let expr = selection.to_expr(batch.schema_ref());
    let filtered = apply_expr(batch, &expr)?;
    log::debug!(
        "Filter selection kept {} of {} rows",
        filtered.num_rows(),
        batch.num_rows()
    );

    let diagnoses = diagnosis_counts(&filtered)?;
    let monthly = monthly_visits(&filtered)?;
    let ages = age_series(&filtered)?;
    let genders = gender_counts(&filtered)?;
    let durations = duration_by_diagnosis(&filtered)?;
    let scores = satisfaction_series(&filtered)?;

    Ok(DashboardViews {
        filtered_rows: filtered.num_rows(),
        diagnoses: QuestionView {
            interpretation: summary::describe_diagnoses(&diagnoses),
            outcome: diagnoses,
        },
        monthly_visits: QuestionView {
            interpretation: summary::describe_monthly(&monthly),
            outcome: monthly,
        },
        ages: QuestionView {
            interpretation: summary::describe_ages(&ages),
            outcome: ages,
        },
        gender_breakdown: QuestionView {
            interpretation: summary::describe_genders(&genders),
            outcome: genders,
        },
        duration_by_diagnosis: QuestionView {
            interpretation: summary::describe_durations(&durations),
            outcome: durations,
        },
        satisfaction_scores: QuestionView {
            interpretation: summary::describe_satisfaction(&scores),
            outcome: scores,
        },
    })
}

/// First `rows` rows of a batch, for the preview panes
#[must_use]
pub fn head(batch: &RecordBatch, rows: usize) -> RecordBatch {
    batch.slice(0, rows.min(batch.num_rows()))
}

/// Last `rows` rows of a batch, for the preview panes
#[must_use]
pub fn tail(batch: &RecordBatch, rows: usize) -> RecordBatch {
    let rows = rows.min(batch.num_rows());
    batch.slice(batch.num_rows() - rows, rows)
}
