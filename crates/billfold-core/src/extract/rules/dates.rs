//! Date recognition tolerant of the formats seen across receipts and
//! statement pages.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::config::DateOrder;

use super::patterns::{DATE_FORMATS_DAY_FIRST, DATE_FORMATS_MONTH_FIRST, DATE_PATTERNS};

/// Find the first parseable date in `text` under the default month-first
/// convention. Patterns are tried in order, and within each pattern every
/// match is tried against the format table; the first specimen that parses
/// wins.
pub fn find_date(text: &str) -> Option<NaiveDateTime> {
    find_date_ordered(text, DateOrder::MonthFirst)
}

/// Find the first parseable date in `text` under an explicit day/month
/// convention.
pub fn find_date_ordered(text: &str, order: DateOrder) -> Option<NaiveDateTime> {
    for pattern in DATE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            if let Some(date) = parse_date_str(m.as_str(), order) {
                return Some(date);
            }
        }
    }
    None
}

/// Parse a date string against the ordered format table for `order`.
/// Ambiguous numeric dates resolve to whichever format comes first.
pub fn parse_date_str(s: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let formats = match order {
        DateOrder::MonthFirst => DATE_FORMATS_MONTH_FIRST,
        DateOrder::DayFirst => DATE_FORMATS_DAY_FIRST,
    };

    let s = s.trim();
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            // %Y happily eats two-digit years as year 24; defer those
            // specimens to the %y formats further down the table.
            if date.year() < 100 {
                continue;
            }
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn finds_slash_dates() {
        assert_eq!(find_date("purchased 01/02/2024 at noon"), Some(ymd(2024, 1, 2)));
        assert_eq!(find_date("1/2/2024"), Some(ymd(2024, 1, 2)));
    }

    #[test]
    fn finds_iso_dates() {
        assert_eq!(find_date("posted 2024-01-15"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn finds_dash_dates() {
        assert_eq!(find_date("01-23-2024"), Some(ymd(2024, 1, 23)));
    }

    #[test]
    fn finds_month_name_dates() {
        assert_eq!(find_date("January 23, 2024"), Some(ymd(2024, 1, 23)));
        assert_eq!(find_date("Jan 23, 2024"), Some(ymd(2024, 1, 23)));
        assert_eq!(find_date("23 January 2024"), Some(ymd(2024, 1, 23)));
    }

    #[test]
    fn finds_two_digit_year() {
        assert_eq!(find_date("01/23/24"), Some(ymd(2024, 1, 23)));
    }

    #[test]
    fn month_first_wins_on_ambiguous_dates() {
        // 03/04/2024 is April 3rd in day-first locales; the default reads
        // it as March 4th.
        assert_eq!(find_date("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(
            find_date_ordered("03/04/2024", DateOrder::DayFirst),
            Some(ymd(2024, 4, 3))
        );
    }

    #[test]
    fn day_first_fallback_still_parses_unambiguous_dates() {
        // Month-first cannot make sense of a day > 12 in the first slot, so
        // the day-first format further down the table picks it up.
        assert_eq!(find_date("31/12/2024"), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn absence_is_none() {
        assert_eq!(find_date("no dates here"), None);
        assert_eq!(find_date(""), None);
        // A matched specimen that parses under no format is skipped, and the
        // scan moves on to later matches.
        assert_eq!(find_date("99/99/9999 then 01/02/2024"), Some(ymd(2024, 1, 2)));
    }
}
