//! Calendar months and named reporting periods
//!
//! All ranges are inclusive on both ends and computed from an explicit
//! reference date so results never depend on the wall clock.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, represented by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// The month that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().0 - Duration::days(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + Months::new(1))
    }

    pub fn prev(&self) -> Self {
        self.minus(1)
    }

    /// The month `n` months earlier, saturating at the earliest representable month
    pub fn minus(&self, n: u32) -> Self {
        match self.0.checked_sub_months(Months::new(n)) {
            Some(date) => Self(date),
            None => Self::containing(NaiveDate::MIN),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Month::containing(date) == *self
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    /// Short display label, e.g. `Mar 2025`
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| PeriodParseError(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Named periods offered by the financial reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    #[default]
    CurrentMonth,
    LastMonth,
    LastThreeMonths,
    YearToDate,
}

impl ReportPeriod {
    pub fn all() -> [ReportPeriod; 4] {
        [
            Self::CurrentMonth,
            Self::LastMonth,
            Self::LastThreeMonths,
            Self::YearToDate,
        ]
    }

    /// Resolve the period relative to `today`
    ///
    /// Year-to-date ends on `today` itself; the others end on a month end.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        let this_month = Month::containing(today);
        match self {
            Self::CurrentMonth => this_month.range(),
            Self::LastMonth => this_month.prev().range(),
            Self::LastThreeMonths => {
                DateRange::new(this_month.minus(2).first_day(), this_month.last_day())
            }
            Self::YearToDate => {
                DateRange::new(this_month.minus(today.month0()).first_day(), today)
            }
        }
    }

    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_lowercase().as_str() {
            "current-month" | "month" => Ok(Self::CurrentMonth),
            "last-month" => Ok(Self::LastMonth),
            "last-3-months" | "quarter" => Ok(Self::LastThreeMonths),
            "ytd" | "year-to-date" => Ok(Self::YearToDate),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CurrentMonth => "current-month",
            Self::LastMonth => "last-month",
            Self::LastThreeMonths => "last-3-months",
            Self::YearToDate => "ytd",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid period: {}", self.0)
    }
}

impl std::error::Error for PeriodParseError {}
