// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// The canonical reporting windows, in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Yesterday,
    #[serde(rename = "last_7_days")]
    Last7Days,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    AllTime,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::Today,
        Period::Yesterday,
        Period::Last7Days,
        Period::ThisMonth,
        Period::LastMonth,
        Period::ThisYear,
        Period::LastYear,
        Period::AllTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Yesterday => "Yesterday",
            Period::Last7Days => "Last 7 Days",
            Period::ThisMonth => "This Month",
            Period::LastMonth => "Last Month",
            Period::ThisYear => "This Year",
            Period::LastYear => "Last Year",
            Period::AllTime => "All Time",
        }
    }

    pub fn is_bounded(self) -> bool {
        self != Period::AllTime
    }

    /// The window for this period, relative to `today`.
    pub fn window(self, today: NaiveDate) -> ReportWindow {
        match self {
            Period::Today => ReportWindow::days(today, today),
            Period::Yesterday => {
                let yesterday = today - Duration::days(1);
                ReportWindow::days(yesterday, yesterday)
            }
            Period::Last7Days => ReportWindow::days(today - Duration::days(7), today),
            Period::ThisMonth => ReportWindow::days(first_of_month(today), today),
            Period::LastMonth => {
                let last_day = first_of_month(today) - Duration::days(1);
                ReportWindow::days(first_of_month(last_day), last_day)
            }
            Period::ThisYear => ReportWindow::days(first_of_year(today), today),
            Period::LastYear => {
                let last_day = first_of_year(today) - Duration::days(1);
                ReportWindow::days(first_of_year(last_day), last_day)
            }
            Period::AllTime => ReportWindow::unbounded(),
        }
    }
}

/// A closed interval of timestamps. `None` on a side means no bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl ReportWindow {
    /// From 00:00:00 of `first_day` to 23:59:59 of `last_day`.
    pub fn days(first_day: NaiveDate, last_day: NaiveDate) -> Self {
        Self {
            start: Some(start_of_day(first_day)),
            end: Some(end_of_day(last_day)),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// All eight windows relative to the reference instant `now`.
pub fn build_windows(now: NaiveDateTime) -> Vec<(Period, ReportWindow)> {
    let today = now.date();
    Period::ALL
        .iter()
        .map(|&period| (period, period.window(today)))
        .collect()
}

/// Parse a `--now` style reference time: a date, or a date with time.
pub fn parse_reference_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(LAST_SECOND_OF_DAY)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bounds(window: ReportWindow) -> (NaiveDateTime, NaiveDateTime) {
        (window.start.unwrap(), window.end.unwrap())
    }

    #[test]
    fn test_last_month() {
        let window = Period::LastMonth.window(date("2024-02-15"));
        assert_eq!(
            bounds(window),
            (dt("2024-01-01 00:00:00"), dt("2024-01-31 23:59:59"))
        );
    }

    #[test]
    fn test_last_month_is_leap_february() {
        let window = Period::LastMonth.window(date("2024-03-01"));
        assert_eq!(
            bounds(window),
            (dt("2024-02-01 00:00:00"), dt("2024-02-29 23:59:59"))
        );

        let window = Period::LastMonth.window(date("2023-03-31"));
        assert_eq!(
            bounds(window),
            (dt("2023-02-01 00:00:00"), dt("2023-02-28 23:59:59"))
        );
    }

    #[test]
    fn test_last_month_crosses_year() {
        let window = Period::LastMonth.window(date("2024-01-10"));
        assert_eq!(
            bounds(window),
            (dt("2023-12-01 00:00:00"), dt("2023-12-31 23:59:59"))
        );
    }

    #[test]
    fn test_day_windows() {
        let today = date("2024-03-01");
        assert_eq!(
            bounds(Period::Today.window(today)),
            (dt("2024-03-01 00:00:00"), dt("2024-03-01 23:59:59"))
        );
        assert_eq!(
            bounds(Period::Yesterday.window(today)),
            (dt("2024-02-29 00:00:00"), dt("2024-02-29 23:59:59"))
        );
        assert_eq!(
            bounds(Period::Last7Days.window(today)),
            (dt("2024-02-23 00:00:00"), dt("2024-03-01 23:59:59"))
        );
    }

    #[test]
    fn test_month_and_year_windows() {
        let today = date("2024-08-17");
        assert_eq!(
            bounds(Period::ThisMonth.window(today)),
            (dt("2024-08-01 00:00:00"), dt("2024-08-17 23:59:59"))
        );
        assert_eq!(
            bounds(Period::ThisYear.window(today)),
            (dt("2024-01-01 00:00:00"), dt("2024-08-17 23:59:59"))
        );
        assert_eq!(
            bounds(Period::LastYear.window(today)),
            (dt("2023-01-01 00:00:00"), dt("2023-12-31 23:59:59"))
        );
    }

    #[test]
    fn test_build_windows() {
        let windows = build_windows(dt("2024-02-15 18:30:00"));
        let periods: Vec<Period> = windows.iter().map(|(p, _)| *p).collect();
        assert_eq!(periods, Period::ALL.to_vec());

        let (period, all_time) = windows[7];
        assert_eq!(period, Period::AllTime);
        assert!(all_time.is_unbounded());
        assert!(!period.is_bounded());
        assert!(windows[..7].iter().all(|(p, w)| p.is_bounded() && !w.is_unbounded()));
    }

    #[test]
    fn test_parse_reference_time() {
        assert_eq!(
            parse_reference_time("2024-02-15"),
            Some(dt("2024-02-15 00:00:00"))
        );
        assert_eq!(
            parse_reference_time("2024-02-15 10:11:12"),
            Some(dt("2024-02-15 10:11:12"))
        );
        assert_eq!(
            parse_reference_time("2024-02-15T10:11:12"),
            Some(dt("2024-02-15 10:11:12"))
        );
        assert_eq!(parse_reference_time("15/02/2024"), None);
    }
}
