//! Recurring income projection
//!
//! Expands recurring income definitions into concrete dates and normalizes
//! their amounts to monthly and yearly figures. Occurrences are computed on
//! demand and never stored.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::{DateRange, Frequency, Money, RecurringIncome, RecurringIncomeId};

use super::aggregation::CurrencyTotals;

/// One projected payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingIncome {
    pub income_id: RecurringIncomeId,
    pub title: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub currency: String,
}

/// Overview of a set of recurring incomes on a given day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringSummary {
    /// Monthly equivalents of currently active incomes, per currency
    pub monthly_totals: CurrencyTotals,
    /// Yearly equivalents of currently active incomes, per currency
    pub yearly_totals: CurrencyTotals,
    /// Payments due inside the horizon, soonest first
    pub upcoming: Vec<UpcomingIncome>,
    pub active_count: usize,
    pub inactive_count: usize,
}

/// Projects recurring incomes onto the calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurringProjector;

impl RecurringProjector {
    pub fn new() -> Self {
        Self
    }

    /// Ordered occurrence dates of `income` inside `range`
    pub fn occurrences_between(&self, income: &RecurringIncome, range: &DateRange) -> Vec<NaiveDate> {
        income.occurrences_between(range)
    }

    /// `amount` paid at `frequency`, expressed per month
    pub fn monthly_equivalent(&self, amount: Money, frequency: Frequency) -> Money {
        let (num, den) = frequency.monthly_factor();
        amount.scale(num, den)
    }

    /// Same as [`Self::monthly_equivalent`] for a frequency name; unknown
    /// names count as monthly
    pub fn monthly_equivalent_named(&self, amount: Money, frequency: &str) -> Money {
        self.monthly_equivalent(amount, Frequency::parse_lossy(frequency))
    }

    /// Twelve monthly equivalents
    pub fn yearly_equivalent(&self, amount: Money, frequency: Frequency) -> Money {
        self.monthly_equivalent(amount, frequency).scale(12, 1)
    }

    /// First occurrence whose start of day is strictly after `now`.
    ///
    /// `None` once the series has ended or the date arithmetic overflows.
    pub fn next_occurrence_after(
        &self,
        income: &RecurringIncome,
        now: NaiveDateTime,
    ) -> Option<NaiveDate> {
        let tomorrow = now.date().succ_opt()?;
        income.occurrences_from(tomorrow).next()
    }

    /// Totals and upcoming payments for the incomes active on `today`,
    /// looking `horizon_days` ahead
    pub fn summarize(
        &self,
        incomes: &[RecurringIncome],
        today: NaiveDate,
        horizon_days: u32,
    ) -> RecurringSummary {
        let mut summary = RecurringSummary::default();
        let horizon_end = today
            .checked_add_signed(Duration::days(horizon_days as i64))
            .unwrap_or(NaiveDate::MAX);
        let window = DateRange::whole_days(today, horizon_end);

        for income in incomes {
            if !income.is_currently_active(today) {
                summary.inactive_count += 1;
                continue;
            }
            summary.active_count += 1;

            let monthly = self.monthly_equivalent(income.amount, income.frequency);
            *summary
                .monthly_totals
                .entry(income.currency.clone())
                .or_default() += monthly;
            *summary
                .yearly_totals
                .entry(income.currency.clone())
                .or_default() += monthly.scale(12, 1);

            summary
                .upcoming
                .extend(self.occurrences_between(income, &window).into_iter().map(|date| {
                    UpcomingIncome {
                        income_id: income.id,
                        title: income.title.clone(),
                        date,
                        amount: income.amount,
                        currency: income.currency.clone(),
                    }
                }));
        }

        summary
            .upcoming
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));

        debug!(
            active = summary.active_count,
            inactive = summary.inactive_count,
            upcoming = summary.upcoming.len(),
            "summarized recurring incomes"
        );
        summary
    }
}
