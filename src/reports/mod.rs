//! Reports module for LifeLedger
//!
//! Expense and income summaries for a report period, with terminal and CSV
//! output.

pub mod summary;

pub use summary::{ReportQuery, ReportSummary};
