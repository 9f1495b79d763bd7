use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use chrono_english::{parse_date_string, Dialect};
use dayplan_core::models::hhmm;

/// Accepts `YYYY-MM-DD` or anything chrono-english understands ("tomorrow", "next friday").
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(date_str, Local::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

pub fn parse_time(time_str: &str) -> Result<NaiveTime> {
    hhmm::parse(time_str).map_err(|e| anyhow!("Failed to parse time '{}' (expected HH:MM): {}", time_str, e))
}

/// `YYYY-MM` into (year, month).
pub fn parse_month(month_str: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month_str), "%Y-%m-%d")
        .map_err(|e| anyhow!("Failed to parse month '{}' (expected YYYY-MM): {}", month_str, e))?;
    Ok((first.year(), first.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-02-29").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_date("definitely not a date").is_err());
    }

    #[rstest]
    #[case("09:00", 9, 0)]
    #[case("23:59", 23, 59)]
    #[case("07:30:00", 7, 30)]
    fn test_parse_time(#[case] raw: &str, #[case] h: u32, #[case] m: u32) {
        assert_eq!(parse_time(raw).unwrap(), NaiveTime::from_hms_opt(h, m, 0).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon-ish").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-11").unwrap(), (2024, 11));
        assert!(parse_month("2024-13").is_err());
    }
}
