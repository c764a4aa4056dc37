//! Configuration for the dashboard pipeline.

/// Configuration carried through ingestion, coercion and cleaning.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Number of CSV rows examined during schema inference
    pub schema_sample_rows: usize,
    /// Batch size for reading CSV files
    pub batch_size: usize,
    /// Inclusive age range a row must fall in to survive cleaning
    pub valid_age_range: (f64, f64),
    /// Log every column type coercion for debugging
    pub log_coercions: bool,
    /// Date format configuration for string-to-date conversions
    pub date_format_config: DateFormatConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema_sample_rows: 1000,
            batch_size: 8192,
            valid_age_range: (0.0, 100.0),
            log_coercions: true,
            date_format_config: DateFormatConfig::default(),
        }
    }
}

/// Configuration for parsing visit dates from strings.
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// Formats tried in order when parsing a date string
    pub date_formats: Vec<String>,
    /// Fall back to pattern-based format detection when the fixed list fails
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y/%m/%d".to_string(),
                "%d/%m/%Y".to_string(),
                "%d.%m.%Y".to_string(),
                "%Y%m%d".to_string(),
            ],
            enable_format_detection: true,
        }
    }
}
