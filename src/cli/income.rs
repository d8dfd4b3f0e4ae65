//! Income CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::income::{format_recurring_list, format_recurring_summary};
use crate::display::transaction::format_transaction_register;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{RecurringIncome, TransactionCategory, TransactionType};
use crate::services::{CategoryService, IncomeHub, QuickIncome, RecurringProjector};
use crate::storage::Storage;

use super::{now, parse_date, parse_frequency, parse_money, parse_when, today};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Quick-add a one-off income to the default account
    Add {
        /// Amount (e.g. "250.00")
        amount: String,
        /// Income category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Description (defaults to the category name)
        #[arg(short, long, default_value = "")]
        title: String,
        /// Date, "YYYY-MM-DD" or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List recurring income definitions
    Recurring,
    /// Define a recurring income
    AddRecurring {
        /// Description
        title: String,
        /// Amount per payment
        amount: String,
        /// daily, weekly, biweekly, monthly, quarterly or yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// First payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        start: Option<String>,
        /// Last possible payment date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// ISO currency code
        #[arg(long)]
        currency: Option<String>,
        /// Income category name or ID
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Monthly and yearly totals, upcoming payments and this month's income
    Summary,
}

async fn find_category(
    categories: &CategoryService,
    name: &str,
) -> LedgerResult<TransactionCategory> {
    categories
        .find(name)
        .await?
        .ok_or_else(|| LedgerError::category_not_found(name))
}

/// Handle an income command
pub async fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> LedgerResult<()> {
    let mut hub = IncomeHub::from_storage(
        storage,
        &settings.default_currency,
        settings.reminder_horizon_days,
    );
    let categories = CategoryService::from_storage(storage);

    match cmd {
        IncomeCommands::Add {
            amount,
            category,
            title,
            date,
        } => {
            let category_id = match category {
                Some(name) => Some(find_category(&categories, &name).await?.id),
                None => None,
            };
            let added = hub
                .quick_add(QuickIncome {
                    title,
                    amount: parse_money(&amount)?,
                    category_id,
                    received_at: parse_when(date.as_deref())?,
                })
                .await?;

            println!(
                "Added income: {} {}",
                added.transaction.title,
                added.transaction.amount.format_with_currency(&added.account.currency)
            );
            println!("  {} balance: {}", added.account.name, added.account.balance);
        }

        IncomeCommands::Recurring => {
            let incomes = hub.recurring().await?;
            print!("{}", format_recurring_list(&incomes, today()));
        }

        IncomeCommands::AddRecurring {
            title,
            amount,
            frequency,
            start,
            end,
            currency,
            category,
        } => {
            let start = match start {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            let currency = currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| settings.default_currency.clone());

            let mut income = RecurringIncome::new(
                title,
                parse_money(&amount)?,
                currency,
                parse_frequency(&frequency)?,
                start,
            );
            if let Some(end) = end {
                income = income.ending(parse_date(&end)?);
            }
            if let Some(name) = category {
                let category = find_category(&categories, &name).await?;
                if category.category_type != TransactionType::Income {
                    return Err(LedgerError::Validation(format!(
                        "'{}' is not an income category",
                        category.name
                    )));
                }
                income.category_id = Some(category.id);
            }

            let income = hub.save_recurring(income).await?;
            println!(
                "Saved recurring income: {} {} {}",
                income.title,
                income.amount.format_with_currency(&income.currency),
                income.frequency
            );
            if let Some(next) = RecurringProjector::new().next_occurrence_after(&income, now()) {
                println!("  Next payment: {}", next.format("%Y-%m-%d"));
            }
        }

        IncomeCommands::Summary => {
            let state = hub.refresh(today()).await;
            let overview = match (state.value(), state.error_message()) {
                (Some(overview), _) => overview.clone(),
                (None, Some(message)) => return Err(LedgerError::Storage(message.to_string())),
                (None, None) => return Ok(()),
            };

            print!("{}", format_recurring_summary(&overview.recurring));

            println!("\nReceived this month:");
            if overview.month_received.is_empty() {
                println!("  nothing yet");
            }
            for (currency, amount) in &overview.month_received {
                println!("  {:<4} {:>12}", currency, amount);
            }

            if !overview.recent.is_empty() {
                let names: HashMap<_, _> = categories
                    .list_by_type(TransactionType::Income)
                    .await?
                    .into_iter()
                    .map(|c| (c.id, c.name))
                    .collect();
                println!("\nRecent income:");
                print!("{}", format_transaction_register(&overview.recent, &names));
            }
        }
    }

    Ok(())
}
