//! Recurring income model
//!
//! A recurring income is a definition, not a list: occurrence dates are
//! derived on demand from the start date and frequency and are never
//! persisted.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, RecurringIncomeId};
use super::money::Money;
use super::period::DateRange;

/// How often a recurring income pays out
///
/// Unrecognized strings deserialize as `Monthly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// Distance between two consecutive occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Days(i64),
    Months(u32),
}

impl Frequency {
    /// Parse a frequency name; anything unrecognized is monthly
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "biweekly" | "bi-weekly" | "fortnightly" => Self::Biweekly,
            "quarterly" => Self::Quarterly,
            "yearly" | "annually" | "annual" => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    /// Multiplier to a monthly amount as the fraction `(num, den)`.
    ///
    /// These are fixed approximations, not day counts: daily ×30,
    /// weekly ×4.33, biweekly ×2.17, monthly ×1, quarterly ÷3, yearly ÷12.
    pub fn monthly_factor(&self) -> (i64, i64) {
        match self {
            Self::Daily => (30, 1),
            Self::Weekly => (433, 100),
            Self::Biweekly => (217, 100),
            Self::Monthly => (1, 1),
            Self::Quarterly => (1, 3),
            Self::Yearly => (1, 12),
        }
    }

    fn step(&self) -> Step {
        match self {
            Self::Daily => Step::Days(1),
            Self::Weekly => Step::Days(7),
            Self::Biweekly => Step::Days(14),
            Self::Monthly => Step::Months(1),
            Self::Quarterly => Step::Months(3),
            Self::Yearly => Step::Months(12),
        }
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        Self::parse_lossy(&s)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        };
        write!(f, "{}", name)
    }
}

/// Validation errors for recurring incomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    EmptyTitle,
    NonPositiveAmount,
    EndBeforeStart,
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Recurring income title cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Recurring income amount must be greater than zero"),
            Self::EndBeforeStart => write!(f, "End date cannot be before the start date"),
        }
    }
}

impl std::error::Error for RecurringValidationError {}

/// A recurring income definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringIncome {
    pub id: RecurringIncomeId,

    pub title: String,

    pub amount: Money,

    pub currency: String,

    pub category_id: Option<CategoryId>,

    pub frequency: Frequency,

    /// First occurrence
    pub start_date: NaiveDate,

    /// Last possible occurrence (inclusive)
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl RecurringIncome {
    /// Create a new, active recurring income
    pub fn new(
        title: impl Into<String>,
        amount: Money,
        currency: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecurringIncomeId::new(),
            title: title.into(),
            amount,
            currency: currency.into(),
            category_id: None,
            frequency,
            start_date,
            end_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: set the last possible occurrence date
    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Validate the definition
    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecurringValidationError::EmptyTitle);
        }
        if !self.amount.is_positive() {
            return Err(RecurringValidationError::NonPositiveAmount);
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RecurringValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }

    /// Active flag set, already started and not yet ended on `today`
    pub fn is_currently_active(&self, today: NaiveDate) -> bool {
        self.is_active
            && self.start_date <= today
            && self.end_date.map_or(true, |end| end >= today)
    }

    /// Whether the series has no occurrences left after `today`
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end <= today)
    }

    /// Amount normalized to an average month
    pub fn monthly_equivalent(&self) -> Money {
        let (num, den) = self.frequency.monthly_factor();
        self.amount.scale(num, den)
    }

    /// Amount normalized to a year (twelve monthly equivalents)
    pub fn yearly_equivalent(&self) -> Money {
        self.monthly_equivalent().scale(12, 1)
    }

    /// The n-th occurrence (0-based), computed from the start date so month
    /// clamping never drifts. `None` on date overflow.
    pub fn nth_occurrence(&self, n: u32) -> Option<NaiveDate> {
        match self.frequency.step() {
            Step::Days(k) => self
                .start_date
                .checked_add_signed(Duration::days(k.checked_mul(n as i64)?)),
            Step::Months(k) => self
                .start_date
                .checked_add_months(Months::new(k.checked_mul(n)?)),
        }
    }

    /// Lazy iterator over every occurrence, bounded by the end date
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences {
            income: self,
            index: 0,
            done: false,
        }
    }

    /// Lazy iterator starting at the first occurrence on or after `date`
    pub fn occurrences_from(&self, date: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        Occurrences {
            income: self,
            index: self.index_lower_bound(date),
            done: false,
        }
        .skip_while(move |occurrence| *occurrence < date)
    }

    /// Ordered occurrence dates that fall inside `range`
    pub fn occurrences_between(&self, range: &DateRange) -> Vec<NaiveDate> {
        let last = range.end_date();
        self.occurrences_from(range.start_date())
            .take_while(|occurrence| *occurrence <= last)
            .collect()
    }

    /// Largest index whose occurrence is guaranteed to be before `date`
    fn index_lower_bound(&self, date: NaiveDate) -> u32 {
        if date <= self.start_date {
            return 0;
        }
        let estimate = match self.frequency.step() {
            Step::Days(k) => (date - self.start_date).num_days() / k,
            Step::Months(k) => {
                let months = (date.year() - self.start_date.year()) as i64 * 12
                    + date.month() as i64
                    - self.start_date.month() as i64;
                months / k as i64
            }
        };
        u32::try_from(estimate.max(0)).unwrap_or(u32::MAX)
    }
}

/// Iterator over the occurrence dates of a `RecurringIncome`
pub struct Occurrences<'a> {
    income: &'a RecurringIncome,
    index: u32,
    done: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.income.nth_occurrence(self.index).filter(|date| {
            self.income.end_date.map_or(true, |end| *date <= end)
        });
        match next {
            Some(date) => {
                self.index = match self.index.checked_add(1) {
                    Some(index) => index,
                    None => {
                        self.done = true;
                        self.index
                    }
                };
                Some(date)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}
