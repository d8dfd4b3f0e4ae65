//! Transaction CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::display::transaction::format_transaction_register;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{AccountService, CategoryService, NewTransaction, TransactionService};
use crate::storage::Storage;

use super::category::parse_type;
use super::{parse_money, parse_when};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Short description
        title: String,
        /// Amount (e.g. "12.50")
        amount: String,
        /// expense or income
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// ISO currency code (defaults to the account's)
        #[arg(long)]
        currency: Option<String>,
        /// Date, "YYYY-MM-DD" or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        date: Option<String>,
        /// Mark as cleared
        #[arg(long)]
        cleared: bool,
    },
    /// List transactions, newest first
    List {
        /// Only show one type (expense or income)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::from_storage(storage);
    let categories = CategoryService::from_storage(storage);

    match cmd {
        TransactionCommands::Add {
            title,
            amount,
            kind,
            category,
            account,
            currency,
            date,
            cleared,
        } => {
            let transaction_type = parse_type(&kind)?;

            let category_id = match category {
                Some(name) => Some(
                    categories
                        .find(&name)
                        .await?
                        .ok_or_else(|| LedgerError::category_not_found(&name))?
                        .id,
                ),
                None => None,
            };

            let account_id = match account {
                Some(name) => Some(
                    AccountService::from_storage(storage)
                        .find(&name)
                        .await?
                        .ok_or_else(|| LedgerError::account_not_found(&name))?
                        .id,
                ),
                None => None,
            };

            let txn = service
                .create(NewTransaction {
                    title,
                    amount: parse_money(&amount)?,
                    transaction_type,
                    currency,
                    category_id,
                    account_id,
                    transaction_date: parse_when(date.as_deref())?,
                    cleared,
                })
                .await?;

            println!(
                "Recorded {}: {} {}",
                txn.transaction_type,
                txn.title,
                txn.amount
                    .format_with_currency(txn.currency.as_deref().unwrap_or(""))
                    .trim()
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List { kind, limit } => {
            let filter = kind.as_deref().map(parse_type).transpose()?;
            let transactions: Vec<_> = service
                .list()
                .await?
                .into_iter()
                .filter(|t| filter.map_or(true, |k| t.transaction_type == k))
                .take(limit)
                .collect();

            let names: HashMap<_, _> = categories
                .list()
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!("{}", format_transaction_register(&transactions, &names));
        }
    }

    Ok(())
}
