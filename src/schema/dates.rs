//! Tolerant date parsing for the visit-date column.

use chrono::NaiveDate;

use crate::config::DateFormatConfig;

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // If enabled, try to detect the format based on string patterns
    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // ISO-like format with dashes (YYYY-MM-DD)
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                // Day-first when the leading component cannot be a month
                return Some("%d/%m/%Y");
            }
        }
    }

    // Dotted format (DD.MM.YYYY)
    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    // Compact format (YYYYMMDD)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}

/// Convert a Date32 value (days since epoch) to a calendar date
#[must_use]
pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(i64::from(days)))
}

/// Convert a calendar date to a Date32 value (days since epoch)
#[must_use]
pub fn days_from_date(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    date.signed_duration_since(epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_configured_formats() {
        let config = DateFormatConfig::default();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        assert_eq!(parse_date_string("2024-01-05", &config), Some(expected));
        assert_eq!(parse_date_string("2024/01/05", &config), Some(expected));
        assert_eq!(parse_date_string("05/01/2024", &config), Some(expected));
        assert_eq!(parse_date_string("05.01.2024", &config), Some(expected));
        assert_eq!(parse_date_string("20240105", &config), Some(expected));
        assert_eq!(parse_date_string(" 2024-01-05 ", &config), Some(expected));
    }

    #[test]
    fn unparsable_dates_yield_none() {
        let config = DateFormatConfig::default();
        assert_eq!(parse_date_string("not a date", &config), None);
        assert_eq!(parse_date_string("2024-13-40", &config), None);
        assert_eq!(parse_date_string("", &config), None);
    }

    #[test]
    fn detects_common_patterns() {
        assert_eq!(detect_date_format("2024-01-05"), Some("%Y-%m-%d"));
        assert_eq!(detect_date_format("2024/01/05"), Some("%Y/%m/%d"));
        assert_eq!(detect_date_format("25/01/2024"), Some("%d/%m/%Y"));
        assert_eq!(detect_date_format("25.01.2024"), Some("%d.%m.%Y"));
        assert_eq!(detect_date_format("20240105"), Some("%Y%m%d"));
        assert_eq!(detect_date_format("Jan 5"), None);
    }

    #[test]
    fn day_conversions_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date_from_days(days_from_date(date)), Some(date));
        assert_eq!(days_from_date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
    }
}
