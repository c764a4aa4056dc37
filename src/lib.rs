//! Analytic core for a patient-visit dashboard: CSV ingestion, schema
//! coercion, row cleaning, interactive filter predicates and five
//! descriptive-statistics aggregators over Arrow record batches.
//!
//! The rendering framework hosting the dashboard is an external collaborator;
//! this crate exposes the pure recomputation pipeline it drives on every
//! interaction: load once into a [`Session`], then
//! [`render`] the cleaned table against the current [`FilterSelection`].

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod reader;
pub mod schema;

// Re-export the most common types for easier use
// Core types
pub use config::{DashboardConfig, DateFormatConfig};
pub use error::{InsightsError, Result};

// Arrow table substrate
pub use arrow::record_batch::RecordBatch;

// Pipeline stages
pub use clean::clean_batch;
pub use reader::{read_csv, read_csv_from};
pub use schema::coerce_batch;

// Filtering capabilities
pub use filter::{Expr, FilterSelection, apply_expr, evaluate_expr, filter_batch};

// Aggregation and views
pub use aggregate::AggregateOutcome;
pub use dashboard::{DashboardViews, FilterOptions, QuestionView, Session, head, render, tail};
