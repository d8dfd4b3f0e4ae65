//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and simple bar charts.

pub mod account;
pub mod bill;
pub mod category;
pub mod chart;
pub mod income;
pub mod transaction;

pub use account::format_account_list;
pub use bill::{format_bill_list, format_profile_list, format_reminder_list};
pub use category::format_category_list;
pub use income::{format_recurring_list, format_recurring_summary};
pub use transaction::format_transaction_register;
