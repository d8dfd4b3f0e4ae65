use anyhow::Result;
use clap::{Parser, Subcommand};

use lifeledger::cli::{
    handle_account_command, handle_bill_command, handle_category_command, handle_income_command,
    handle_report_command, handle_security_command, handle_sync_command,
    handle_transaction_command, AccountCommands, BillCommands, CategoryCommands, IncomeCommands,
    ReportArgs, SecurityCommands, TransactionCommands,
};
use lifeledger::config::{LedgerPaths, Settings};
use lifeledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "lifeledger",
    version,
    about = "Expenses, income, reports and bill reminders from the command line",
    long_about = "LifeLedger tracks expenses and income per currency, summarizes them \
                  by day, week, month or year, projects recurring income, and keeps a \
                  reminder schedule for upcoming bills."
)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default categories and a default account
    Init,

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Expense or income report for a period
    Report(ReportArgs),

    /// Quick-add and recurring income
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Bills and their reminders
    #[command(subcommand)]
    Bill(BillCommands),

    /// Rebuild the bill reminder schedule
    Sync,

    /// Passcode and memorable word
    #[command(subcommand)]
    Security(SecurityCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    lifeledger::log::init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing LifeLedger at: {}", paths.base_dir().display());
            let summary = initialize_storage(&storage, &settings).await?;
            println!("Initialization complete!");
            if summary.categories_created > 0 {
                println!("  Created {} default categories", summary.categories_created);
            }
            if summary.default_account_created {
                println!(
                    "  Created default account 'Main' ({})",
                    settings.default_currency
                );
            }
            println!();
            println!("Run 'lifeledger category list' to see all categories.");
        }
        Some(Commands::Config) => {
            println!("LifeLedger Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Default currency:      {}", settings.default_currency);
            println!("  Default report period: {}", settings.default_report_period);
            println!("  Reminder horizon:      {} days", settings.reminder_horizon_days);
            println!("  Date format:           {}", settings.date_format);
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, &settings.default_currency, cmd).await?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd).await?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&storage, cmd).await?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, &settings, args).await?;
        }
        Some(Commands::Income(cmd)) => {
            handle_income_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Bill(cmd)) => {
            handle_bill_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Sync) => {
            handle_sync_command(&storage, &settings).await?;
        }
        Some(Commands::Security(cmd)) => {
            handle_security_command(&storage, cmd).await?;
        }
        None => {
            println!("LifeLedger - expenses, income and bill reminders");
            println!();
            println!("Run 'lifeledger --help' for usage information.");
            println!("Run 'lifeledger init' to get started.");
        }
    }

    Ok(())
}
