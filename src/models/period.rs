//! Report periods and resolved date ranges
//!
//! A `ReportPeriod` is what the user picks (day, week, month, ...). A
//! `DateRange` is the concrete inclusive interval it resolves to.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Period kinds offered by the report dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Day,
    Week,
    #[default]
    Month,
    SixMonths,
    Year,
    /// Everything on record
    All,
}

impl ReportPeriod {
    /// All period kinds, in dashboard order
    pub fn all() -> [ReportPeriod; 6] {
        [
            Self::Day,
            Self::Week,
            Self::Month,
            Self::SixMonths,
            Self::Year,
            Self::All,
        ]
    }

    /// Parse a period name
    ///
    /// Formats: "day", "week", "month", "6m" / "six_months", "year", "all" / "custom"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "today" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "6m" | "six_months" | "sixmonths" | "half" => Ok(Self::SixMonths),
            "year" | "y" => Ok(Self::Year),
            "all" | "custom" | "all_time" => Ok(Self::All),
            _ => Err(PeriodParseError::InvalidFormat(s.to_string())),
        }
    }

    /// Short label used in report headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::SixMonths => "6 Months",
            Self::Year => "Year",
            Self::All => "All Time",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Inclusive date-time interval with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Create a range, or `None` if `end` precedes `start`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whole-day range: 00:00:00 on `first` through 23:59:59 on `last`.
    /// The dates are swapped if given in reverse order.
    pub fn whole_days(first: NaiveDate, last: NaiveDate) -> Self {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: end_of_day(last),
        }
    }

    /// A single calendar day
    pub fn single_day(date: NaiveDate) -> Self {
        Self::whole_days(date, date)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Number of calendar days touched by the range (at least 1)
    pub fn total_days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days() + 1
    }

    /// Check if a date-time falls within the range (inclusive)
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    /// Check if a calendar date is touched by the range
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start.date() && date <= self.end.date()
    }

    /// Iterate over every calendar day in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date();
        let count = self.total_days();
        (0..count).map(move |offset| first + Duration::days(offset))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// 23:59:59 on the given date
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(
                f,
                "Invalid period '{}'. Valid periods: day, week, month, 6m, year, all",
                s
            ),
        }
    }
}

impl std::error::Error for PeriodParseError {}
