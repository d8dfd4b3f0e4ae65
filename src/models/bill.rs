//! Bill model
//!
//! A bill is an upcoming payment with a due date. Bills drive the reminder
//! schedule; paying one records an expense transaction.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, BillId, CategoryId};
use super::money::Money;
use super::recurring::Frequency;

/// A bill to be paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,

    pub title: String,

    pub amount: Money,

    pub currency: String,

    pub category_id: Option<CategoryId>,

    pub account_id: Option<AccountId>,

    pub due_date: NaiveDate,

    /// Repeat cadence; `None` for one-off bills
    #[serde(default)]
    pub frequency: Option<Frequency>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub is_paid: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Bill {
    /// Create a new active, unpaid bill
    pub fn new(
        title: impl Into<String>,
        amount: Money,
        currency: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            title: title.into(),
            amount,
            currency: currency.into(),
            category_id: None,
            account_id: None,
            due_date,
            frequency: None,
            is_active: true,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: make the bill repeat
    pub fn repeating(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Active and still waiting for payment
    pub fn is_outstanding(&self) -> bool {
        self.is_active && !self.is_paid
    }

    /// Move the due date
    pub fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = due_date;
        self.is_paid = false;
        self.updated_at = Utc::now();
    }

    /// Record a payment. Repeating bills roll over to their next due date
    /// and stay outstanding; one-off bills are marked paid.
    pub fn mark_paid(&mut self) {
        match self.frequency.and_then(|f| next_due_date(self.due_date, f)) {
            Some(next) => {
                self.due_date = next;
                self.is_paid = false;
            }
            None => self.is_paid = true,
        }
        self.updated_at = Utc::now();
    }

    /// Days until the due date (negative when overdue)
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }
}

fn next_due_date(due: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => due.succ_opt(),
        Frequency::Weekly => due.checked_add_signed(chrono::Duration::days(7)),
        Frequency::Biweekly => due.checked_add_signed(chrono::Duration::days(14)),
        Frequency::Monthly => due.checked_add_months(Months::new(1)),
        Frequency::Quarterly => due.checked_add_months(Months::new(3)),
        Frequency::Yearly => due.checked_add_months(Months::new(12)),
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (due {})", self.title, self.due_date.format("%Y-%m-%d"))
    }
}
