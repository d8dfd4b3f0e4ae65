//! Core data models for LifeLedger
//!
//! This module contains the data structures of the finance domain:
//! transactions, categories, accounts, bills, recurring incomes, bill
//! notification profiles and reminders, plus report periods.

pub mod account;
pub mod bill;
pub mod category;
pub mod ids;
pub mod money;
pub mod notification;
pub mod period;
pub mod recurring;
pub mod reminder;
pub mod transaction;

pub use account::Account;
pub use bill::Bill;
pub use category::{default_categories, TransactionCategory};
pub use ids::{AccountId, BillId, CategoryId, RecurringIncomeId, TransactionId};
pub use money::Money;
pub use notification::{
    BillNotificationProfile, ReminderKind, ReminderTemplate, DEFAULT_TEMPLATE_KEY,
};
pub use period::{DateRange, ReportPeriod};
pub use recurring::{Frequency, RecurringIncome};
pub use reminder::Reminder;
pub use transaction::{Transaction, TransactionType};
