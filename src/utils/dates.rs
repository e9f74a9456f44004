use chrono::{Days, Local, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `days` consecutive dates ending with `end`, oldest first.
pub fn range_ending(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-01-05"), Ok(date(2026, 1, 5)));
        assert!(parse_date("01/05/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }

    #[test]
    fn test_range_ending_crosses_month() {
        assert_eq!(
            range_ending(date(2024, 3, 1), 3),
            vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn test_range_of_one_is_end() {
        assert_eq!(range_ending(date(2024, 1, 1), 1), vec![date(2024, 1, 1)]);
        assert!(range_ending(date(2024, 1, 1), 0).is_empty());
    }
}
