//! Report CLI command

use std::fs::File;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::TransactionType;
use crate::reports::{ReportQuery, ReportSummary};
use crate::services::{RangeResolver, TransactionAggregator};
use crate::storage::Storage;

use super::{now, parse_date, today};

/// Which side of the ledger to report on
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportKind {
    Expense,
    Income,
}

impl From<ReportKind> for TransactionType {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Expense => TransactionType::Expense,
            ReportKind::Income => TransactionType::Income,
        }
    }
}

/// Report arguments
#[derive(Args)]
pub struct ReportArgs {
    /// expense or income
    #[arg(value_enum)]
    pub kind: ReportKind,
    /// day, week, month, 6m, year or all (defaults to the configured period)
    #[arg(short, long)]
    pub period: Option<String>,
    /// Date inside the period (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub anchor: Option<String>,
    /// Move by this many periods (negative goes back)
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    pub shift: i32,
    /// Only count one currency
    #[arg(short, long)]
    pub currency: Option<String>,
    /// Write the daily series to this CSV file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

/// Handle the report command
pub async fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> LedgerResult<()> {
    let period = match args.period {
        Some(p) => RangeResolver::new().parse_period(&p)?,
        None => settings.default_report_period,
    };
    let anchor = match args.anchor {
        Some(a) => parse_date(&a)?,
        None => today(),
    };

    let mut query = ReportQuery::new(args.kind.into(), period, anchor);
    query.shift = args.shift;
    query.currency = args.currency.map(|c| c.trim().to_uppercase());

    let aggregator = TransactionAggregator::new(settings.default_currency.clone());
    let summary = ReportSummary::generate(
        storage.transactions.as_ref(),
        storage.categories.as_ref(),
        &aggregator,
        &query,
        now(),
    )
    .await?;

    print!("{}", summary.format_terminal());

    if let Some(path) = args.export {
        let file = File::create(&path)?;
        summary.export_csv(file)?;
        println!("\nDaily series written to {}", path.display());
    }

    Ok(())
}
