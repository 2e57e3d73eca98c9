use crate::error::{RestError, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

/// Wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check that both dates parse and that `start` is not after `end`.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DDTHH:MM[:SS]`.
/// Equal dates are a valid one-day range.
pub fn validate_date_range(start: &str, end: &str) -> Result<()> {
    let start = parse_date(start)
        .ok_or_else(|| RestError::validation("Invalid start date format. Use YYYY-MM-DD"))?;
    let end = parse_date(end)
        .ok_or_else(|| RestError::validation("Invalid end date format. Use YYYY-MM-DD"))?;

    if start > end {
        return Err(RestError::validation(
            "Start date must be before or equal to end date",
        ));
    }

    Ok(())
}

/// Parse a date or timestamp into a naive UTC instant
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Format a date the way the API expects it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Current UTC date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Today through thirty days from now, formatted for the API
pub fn default_date_range() -> (String, String) {
    let start = today();
    let end = start.checked_add_days(Days::new(30)).unwrap_or(start);
    (format_date(start), format_date(end))
}
