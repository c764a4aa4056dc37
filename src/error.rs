//! Error handling for the visit-insights pipeline.

use thiserror::Error;

/// Specialized error type for the dashboard pipeline.
///
/// Missing or unparsable *values* never surface here: coercion turns them
/// into nulls and the aggregators degrade to their "no data" sentinel. This
/// type covers genuine faults only, such as unreadable files or malformed
/// CSV structure.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error from an Arrow kernel or the CSV reader
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// Error with the shape or types of the table
    #[error("Schema error: {0}")]
    Schema(String),
    /// Error evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),
}

impl InsightsError {
    /// Create a schema error from a message
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a filter error from a message
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }
}

/// Result type for dashboard pipeline operations
pub type Result<T> = std::result::Result<T, InsightsError>;
