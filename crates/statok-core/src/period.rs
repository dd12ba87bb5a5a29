//! Report period resolution
//!
//! Turns a period selector (`3`, `6`, `12`, `this-month`, ...) or an explicit
//! `from`/`to` pair into a [`ReportWindow`].

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Period selectors accepted by [`resolve_period`], for help text
pub const PERIODS: &str =
    "3, 6, 12, this-month, last-month, this-year, last-year, last-30-days, last-90-days, last-12-months, all";

/// The date range a report covers, plus the reference "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub today: NaiveDate,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        Self { start, end, today }
    }

    /// Window covering the last `months` months up to `today`
    pub fn last_months(months: u32, today: NaiveDate) -> Self {
        Self::new(months_before(today, months), today, today)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First day of the forecaster's history window
    pub fn history_start(&self, history_months: u32) -> NaiveDate {
        months_before(self.today, history_months)
    }
}

/// `date` moved back by whole months, clamping to the end of shorter months
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// `date` moved forward by whole months, clamping to the end of shorter months
pub fn months_after(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Human label for a month ("October 2026")
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidData(format!("Invalid date {}-{}-{}", year, month, day)))
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidData(format!("Invalid {} date format (use YYYY-MM-DD)", field))
    })
}

/// Resolve a period selector to a report window ending at `today`
///
/// Explicit `from`/`to` dates take precedence over the selector.
pub fn resolve_period(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
    today: NaiveDate,
) -> Result<ReportWindow> {
    if let (Some(from), Some(to)) = (custom_from, custom_to) {
        let start = parse_date(from, "from")?;
        let end = parse_date(to, "to")?;
        if start > end {
            return Err(Error::InvalidData(
                "from date must not be after to date".to_string(),
            ));
        }
        return Ok(ReportWindow::new(start, end, today));
    }

    let period = period.trim().to_lowercase();

    // Bare month counts ("3", "6", "12") come from the analytics period selector
    if let Ok(months) = period.parse::<u32>() {
        if months == 0 {
            return Err(Error::InvalidData("Period must be at least 1 month".into()));
        }
        return Ok(ReportWindow::last_months(months, today));
    }

    let (start, end) = match period.as_str() {
        "this-month" => (ymd(today.year(), today.month(), 1)?, today),
        "last-month" => {
            let first_of_this = ymd(today.year(), today.month(), 1)?;
            let last_day = first_of_this - Duration::days(1);
            (ymd(last_day.year(), last_day.month(), 1)?, last_day)
        }
        "this-year" => (ymd(today.year(), 1, 1)?, today),
        "last-year" => (ymd(today.year() - 1, 1, 1)?, ymd(today.year() - 1, 12, 31)?),
        "last-30-days" => (today - Duration::days(30), today),
        "last-90-days" => (today - Duration::days(90), today),
        "last-12-months" => (months_before(today, 12), today),
        "all" => (ymd(2000, 1, 1)?, today),
        _ => {
            return Err(Error::InvalidData(format!(
                "Unknown period: {}. Available: {}",
                period, PERIODS
            )))
        }
    };

    Ok(ReportWindow::new(start, end, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_count_period() {
        let window = resolve_period("6", None, None, d(2026, 10, 17)).unwrap();
        assert_eq!(window.start, d(2026, 4, 17));
        assert_eq!(window.end, d(2026, 10, 17));
    }

    #[test]
    fn test_history_start_follows_today_not_window() {
        let window = resolve_period(
            "all",
            Some("2025-01-01"),
            Some("2025-03-31"),
            d(2026, 10, 17),
        )
        .unwrap();
        assert_eq!(window.history_start(6), d(2026, 4, 17));
    }

    #[test]
    fn test_month_arithmetic_clamps() {
        assert_eq!(months_before(d(2026, 3, 31), 1), d(2026, 2, 28));
        assert_eq!(months_after(d(2026, 1, 31), 1), d(2026, 2, 28));
    }

    #[test]
    fn test_last_month_in_january() {
        let window = resolve_period("last-month", None, None, d(2026, 1, 10)).unwrap();
        assert_eq!(window.start, d(2025, 12, 1));
        assert_eq!(window.end, d(2025, 12, 31));
    }

    #[test]
    fn test_custom_range() {
        let window =
            resolve_period("ignored", Some("2024-01-01"), Some("2024-03-31"), d(2026, 1, 1))
                .unwrap();
        assert_eq!(window.start, d(2024, 1, 1));
        assert_eq!(window.end, d(2024, 3, 31));
        assert_eq!(window.today, d(2026, 1, 1));
        assert!(window.contains(d(2024, 2, 29)));
        assert!(!window.contains(d(2024, 4, 1)));
    }

    #[test]
    fn test_invalid_periods() {
        let today = d(2026, 1, 1);
        assert!(resolve_period("fortnight", None, None, today).is_err());
        assert!(resolve_period("0", None, None, today).is_err());
        assert!(resolve_period("", Some("2024-13-01"), Some("2024-01-01"), today).is_err());
        assert!(resolve_period("", Some("2024-02-01"), Some("2024-01-01"), today).is_err());
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(d(2026, 11, 17)), "November 2026");
    }
}
