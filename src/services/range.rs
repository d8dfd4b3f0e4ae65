//! Report range resolution
//!
//! Turns an anchor date and a period kind into the concrete interval a
//! report covers, and moves the anchor back and forth one period at a time.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{DateRange, ReportPeriod};

/// First instant covered by the `all` period
pub fn all_time_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Resolves report periods into date ranges
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeResolver;

impl RangeResolver {
    pub fn new() -> Self {
        Self
    }

    /// The range a report for `period` anchored at `anchor` covers.
    ///
    /// `now` only matters for [`ReportPeriod::All`], which runs until one day
    /// past it.
    pub fn resolve(&self, anchor: NaiveDate, period: ReportPeriod, now: NaiveDateTime) -> DateRange {
        match period {
            ReportPeriod::Day => DateRange::single_day(anchor),
            ReportPeriod::Week => {
                let monday = anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
                DateRange::whole_days(monday, monday + Duration::days(6))
            }
            ReportPeriod::Month => month_span(anchor, 0),
            ReportPeriod::SixMonths => month_span(anchor, 5),
            ReportPeriod::Year => month_span(anchor, 11),
            ReportPeriod::All => {
                let start = all_time_start();
                let end = now + Duration::days(1);
                DateRange::new(start, end).unwrap_or_else(|| DateRange::single_day(now.date()))
            }
        }
    }

    /// Move `anchor` by `steps` periods (negative moves back)
    pub fn shift(&self, anchor: NaiveDate, period: ReportPeriod, steps: i32) -> NaiveDate {
        let shifted = match period {
            ReportPeriod::Day => anchor.checked_add_signed(Duration::days(steps as i64)),
            ReportPeriod::Week => anchor.checked_add_signed(Duration::days(7 * steps as i64)),
            ReportPeriod::Month => add_months(anchor, steps as i64),
            ReportPeriod::SixMonths => add_months(anchor, 6 * steps as i64),
            ReportPeriod::Year => add_months(anchor, 12 * steps as i64),
            ReportPeriod::All => Some(anchor),
        };
        shifted.unwrap_or(anchor)
    }

    /// Shift then resolve in one step
    pub fn resolve_shifted(
        &self,
        anchor: NaiveDate,
        period: ReportPeriod,
        steps: i32,
        now: NaiveDateTime,
    ) -> DateRange {
        self.resolve(self.shift(anchor, period, steps), period, now)
    }

    /// Parse a period name, reporting bad input as a validation error
    pub fn parse_period(&self, s: &str) -> LedgerResult<ReportPeriod> {
        ReportPeriod::parse(s).map_err(|e| LedgerError::Validation(e.to_string()))
    }
}

/// First day of the anchor's month through the last day of the month
/// `extra_months` later
fn month_span(anchor: NaiveDate, extra_months: u32) -> DateRange {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last = first
        .checked_add_months(Months::new(extra_months + 1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange::whole_days(first, last)
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}
