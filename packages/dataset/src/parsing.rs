//! Cell-level parsing: temporal values and column kind inference.

use accident_dashboard_accident_models::{ColumnKind, TIME_FORMAT};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only formats accepted for `dateCommitted`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y"];

/// Date-time formats whose time part is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parses a `dateCommitted` cell.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parses a `timeCommitted` cell. Only `HH:MM:SS` is accepted.
#[must_use]
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

/// Infers the kind of a non-temporal column from its cells.
///
/// Empty cells are missing values and don't take part in inference. A
/// column with no present values is [`ColumnKind::Text`].
#[must_use]
pub fn infer_kind<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let mut integer = true;
    let mut float = true;
    let mut boolean = true;
    let mut any = false;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        any = true;
        integer &= cell.parse::<i64>().is_ok();
        float &= cell.parse::<f64>().is_ok();
        boolean &= cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false");
        if !(integer || float || boolean) {
            break;
        }
    }

    if !any {
        ColumnKind::Text
    } else if integer {
        ColumnKind::Integer
    } else if float {
        ColumnKind::Float
    } else if boolean {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_us_dates() {
        assert_eq!(parse_date("2023-01-15").unwrap().to_string(), "2023-01-15");
        assert_eq!(parse_date("01/15/2023").unwrap().to_string(), "2023-01-15");
        assert_eq!(parse_date(" 2023/01/15 ").unwrap().to_string(), "2023-01-15");
        assert_eq!(parse_date("15-Jan-2023").unwrap().to_string(), "2023-01-15");
    }

    #[test]
    fn drops_time_part_of_datetimes() {
        assert_eq!(
            parse_date("2023-01-15 14:30:00").unwrap().to_string(),
            "2023-01-15"
        );
        assert_eq!(
            parse_date("2023-01-15T14:30:00").unwrap().to_string(),
            "2023-01-15"
        );
        assert_eq!(
            parse_date("01/15/2023 14:30").unwrap().to_string(),
            "2023-01-15"
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        assert!(parse_date("2023-02-30").is_none());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn time_requires_seconds() {
        assert_eq!(parse_time("14:30:05").unwrap().to_string(), "14:30:05");
        assert!(parse_time("14:30").is_none());
        assert!(parse_time("2:30 PM").is_none());
        assert!(parse_time("25:00:00").is_none());
    }

    #[test]
    fn infers_column_kinds() {
        assert_eq!(infer_kind(["1", "", "42"]), ColumnKind::Integer);
        assert_eq!(infer_kind(["1", "2.5"]), ColumnKind::Float);
        assert_eq!(infer_kind(["true", "FALSE"]), ColumnKind::Boolean);
        assert_eq!(infer_kind(["1", "x"]), ColumnKind::Text);
        assert_eq!(infer_kind(["", ""]), ColumnKind::Text);
    }
}
