//! Scheduled bill reminders
//!
//! Reminders are derived data: the scheduler recomputes the whole set from
//! active bills and their notification profiles on every sync.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BillId;
use super::money::Money;
use super::notification::ReminderKind;

/// One pending reminder for a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub bill_id: BillId,

    pub bill_title: String,

    /// Template key the reminder was scheduled under
    pub section: String,

    /// Day the reminder fires
    pub remind_on: NaiveDate,

    pub due_date: NaiveDate,

    pub amount: Money,

    pub currency: String,

    pub kind: ReminderKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_key: Option<String>,
}

impl Reminder {
    /// Identity used to diff two schedules
    pub fn key(&self) -> (BillId, NaiveDate) {
        (self.bill_id, self.remind_on)
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} due {})",
            self.remind_on.format("%Y-%m-%d"),
            self.bill_title,
            self.amount.format_with_currency(&self.currency),
            self.due_date.format("%Y-%m-%d")
        )
    }
}
