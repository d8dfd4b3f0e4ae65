//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod bill;
pub mod category;
pub mod income;
pub mod report;
pub mod security;
pub mod sync;
pub mod transaction;

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Frequency, Money};
use crate::services::{LocalReminderScheduler, ScheduleSync};
use crate::storage::Storage;

pub use account::{handle_account_command, AccountCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportArgs};
pub use security::{handle_security_command, SecurityCommands};
pub use sync::handle_sync_command;
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Coalescing sync over the local reminder scheduler
pub fn schedule_sync(storage: &Storage, settings: &Settings) -> Arc<ScheduleSync> {
    let scheduler = LocalReminderScheduler::from_storage(storage, settings.reminder_horizon_days);
    Arc::new(ScheduleSync::new(Arc::new(scheduler)))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn parse_money(s: &str) -> LedgerResult<Money> {
    Money::parse(s).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '12.50'. Error: {}",
            s, e
        ))
    })
}

pub(crate) fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s)))
}

/// `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`; the current time when absent
pub(crate) fn parse_when(s: Option<&str>) -> LedgerResult<NaiveDateTime> {
    let Some(s) = s else {
        return Ok(now());
    };
    let s = s.trim();
    if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(at);
    }
    let date = parse_date(s)?;
    Ok(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
}

pub(crate) fn parse_frequency(s: &str) -> LedgerResult<Frequency> {
    match s.trim().to_lowercase().as_str() {
        "daily" => Ok(Frequency::Daily),
        "weekly" => Ok(Frequency::Weekly),
        "biweekly" => Ok(Frequency::Biweekly),
        "monthly" => Ok(Frequency::Monthly),
        "quarterly" => Ok(Frequency::Quarterly),
        "yearly" => Ok(Frequency::Yearly),
        _ => Err(LedgerError::Validation(format!(
            "Invalid frequency '{}'. Valid: daily, weekly, biweekly, monthly, quarterly, yearly",
            s
        ))),
    }
}
