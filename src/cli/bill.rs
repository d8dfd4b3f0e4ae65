//! Bill CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::bill::{format_bill_list, format_profile_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Bill, ReminderKind, ReminderTemplate};
use crate::services::{
    AccountService, BillNotificationService, BillService, CategoryService, ProfileChange,
    SyncOutcome,
};
use crate::storage::Storage;

use super::{parse_date, parse_frequency, parse_money, parse_when, schedule_sync, today};

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// List all bills
    List,
    /// Add a bill
    Add {
        /// Bill title
        title: String,
        /// Amount due
        amount: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
        /// Repeat cadence (daily, weekly, biweekly, monthly, quarterly, yearly)
        #[arg(short, long)]
        repeat: Option<String>,
        /// ISO currency code
        #[arg(long)]
        currency: Option<String>,
        /// Expense category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Account to pay from (defaults to the default account)
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Outstanding bills due soon, overdue ones included
    Due {
        /// Days ahead to look
        #[arg(short, long, default_value = "7")]
        within: i64,
    },
    /// Record a payment for a bill
    Paid {
        /// Bill title or ID
        bill: String,
        /// Payment date, "YYYY-MM-DD" or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Change how a bill's reminders are delivered
    Notify {
        /// Bill title or ID
        bill: String,
        /// Reminder template (standard, early, day_of)
        #[arg(short, long)]
        template: Option<String>,
        /// Notification channel key ("" clears it)
        #[arg(long)]
        channel: Option<String>,
        /// Sound key ("" clears it)
        #[arg(long)]
        sound: Option<String>,
        /// Reminder type (silent, alert, alarm, or "default" to clear)
        #[arg(long = "type")]
        kind: Option<String>,
        /// Drop every override for this bill
        #[arg(long, conflicts_with_all = ["template", "channel", "sound", "kind"])]
        reset: bool,
    },
    /// List bills with custom notification profiles
    Profiles,
}

fn print_sync(sync: &SyncOutcome) {
    match sync {
        SyncOutcome::Completed(report) => {
            println!("  Reminders scheduled: {}", report.scheduled)
        }
        SyncOutcome::Coalesced => println!("  Reminder sync queued"),
        SyncOutcome::Suppressed => {
            println!("  Reminders could not be updated; run 'lifeledger sync' to retry")
        }
    }
}

fn parse_template(s: &str) -> LedgerResult<ReminderTemplate> {
    ReminderTemplate::from_key(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid template '{}'. Valid: standard, early, day_of",
            s
        ))
    })
}

fn parse_kind(s: &str) -> LedgerResult<Option<ReminderKind>> {
    if s.trim().eq_ignore_ascii_case("default") {
        return Ok(None);
    }
    ReminderKind::parse(s).map(Some).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid reminder type '{}'. Valid: silent, alert, alarm, default",
            s
        ))
    })
}

async fn find_bill(service: &BillService, identifier: &str) -> LedgerResult<Bill> {
    service
        .find(identifier)
        .await?
        .ok_or_else(|| LedgerError::bill_not_found(identifier))
}

/// Handle a bill command
pub async fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> LedgerResult<()> {
    let sync = schedule_sync(storage, settings);
    let service = BillService::from_storage(storage, sync.clone());

    match cmd {
        BillCommands::List => {
            let bills = service.list().await?;
            print!("{}", format_bill_list(&bills, today()));
        }

        BillCommands::Add {
            title,
            amount,
            due,
            repeat,
            currency,
            category,
            account,
        } => {
            let account = match account {
                Some(name) => Some(
                    AccountService::from_storage(storage)
                        .find(&name)
                        .await?
                        .ok_or_else(|| LedgerError::account_not_found(&name))?,
                ),
                None => None,
            };
            let currency = currency
                .map(|c| c.trim().to_uppercase())
                .or_else(|| account.as_ref().map(|a| a.currency.clone()))
                .unwrap_or_else(|| settings.default_currency.clone());

            let mut bill = Bill::new(title.trim(), parse_money(&amount)?, currency, parse_date(&due)?);
            if let Some(repeat) = repeat {
                bill = bill.repeating(parse_frequency(&repeat)?);
            }
            bill.account_id = account.map(|a| a.id);
            if let Some(name) = category {
                let category = CategoryService::from_storage(storage)
                    .find(&name)
                    .await?
                    .ok_or_else(|| LedgerError::category_not_found(&name))?;
                bill.category_id = Some(category.id);
            }

            let saved = service.create(bill).await?;
            println!(
                "Added bill: {} {} due {}",
                saved.bill.title,
                saved.bill.amount.format_with_currency(&saved.bill.currency),
                saved.bill.due_date.format("%Y-%m-%d")
            );
            println!("  ID: {}", saved.bill.id);
            print_sync(&saved.sync);
        }

        BillCommands::Due { within } => {
            let bills = service.due(today(), within).await?;
            if bills.is_empty() {
                println!("Nothing due in the next {} days.", within);
            } else {
                print!("{}", format_bill_list(&bills, today()));
            }
        }

        BillCommands::Paid { bill, date } => {
            let bill = find_bill(&service, &bill).await?;
            let paid = service.pay(bill.id, parse_when(date.as_deref())?).await?;

            println!(
                "Paid {}: {}",
                paid.bill.title,
                paid.transaction.amount.format_with_currency(&paid.bill.currency)
            );
            if paid.bill.is_paid {
                println!("  Bill settled");
            } else {
                println!("  Next due: {}", paid.bill.due_date.format("%Y-%m-%d"));
            }
            print_sync(&paid.sync);
        }

        BillCommands::Notify {
            bill,
            template,
            channel,
            sound,
            kind,
            reset,
        } => {
            let bill = find_bill(&service, &bill).await?;
            let notifications = BillNotificationService::from_storage(storage, sync.clone());

            let saved = if reset {
                notifications.reset(bill.id).await?
            } else {
                let change = ProfileChange {
                    template: template.as_deref().map(parse_template).transpose()?,
                    channel_key: channel,
                    sound_key: sound,
                    type_override: kind.as_deref().map(parse_kind).transpose()?,
                };
                notifications.update(bill.id, change).await?
            };

            if saved.stored {
                println!(
                    "Notification profile for {}: template {}",
                    bill.title, saved.profile.template_key
                );
            } else {
                println!("{} uses the default notification profile", bill.title);
            }
            print_sync(&saved.sync);
        }

        BillCommands::Profiles => {
            let notifications = BillNotificationService::from_storage(storage, sync.clone());
            let profiles = notifications.profiles().await?;
            let mut rows: Vec<_> = service
                .list()
                .await?
                .into_iter()
                .filter_map(|b| profiles.get(&b.id).cloned().map(|p| (b.title, p)))
                .collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            print!("{}", format_profile_list(&rows));
        }
    }

    Ok(())
}
