//! Date helper functions
//!
//! Post dates are authored as plain calendar date strings in front-matter and
//! kept as strings on the model; parsing happens where an actual ordering or
//! display format is needed.

use chrono::NaiveDate;

/// Formats accepted for post dates, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

/// Parse a post date string into a calendar date.
///
/// Returns `None` for anything that matches no accepted format. Datetime
/// strings like "2024-01-15 10:30:00" are accepted by using only their
/// leading date part.
pub fn parse_post_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, format) {
            return Some(parsed);
        }
    }

    // Fall back to the date part of a "YYYY-MM-DD HH:MM:SS" string
    if let Some(head) = date.split_whitespace().next() {
        if head != date {
            return parse_post_date(head);
        }
    }

    None
}

/// Format a post date for display (like "January 15, 2024").
///
/// Unparseable dates are shown verbatim rather than dropped.
pub fn display_date(date: &str) -> String {
    match parse_post_date(date) {
        Some(parsed) => parsed.format("%B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_post_date("2024-01-15"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_slash_date() {
        assert_eq!(
            parse_post_date("2024/06/01"),
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_long_date() {
        assert_eq!(
            parse_post_date("January 15, 2024"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_datetime_uses_date_part() {
        assert_eq!(
            parse_post_date("2024-01-15 10:30:00"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_post_date("not a date"), None);
        assert_eq!(parse_post_date(""), None);
        assert_eq!(parse_post_date("2024-13-45"), None);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-15"), "January 15, 2024");
        assert_eq!(display_date("soon"), "soon");
    }
}
