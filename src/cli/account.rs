//! Account CLI commands

use clap::Subcommand;

use crate::display::account::format_account_list;
use crate::error::LedgerResult;
use crate::services::AccountService;
use crate::storage::Storage;

use super::parse_money;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List all accounts
    List,
    /// Create a new account
    Add {
        /// Account name
        name: String,
        /// ISO currency code
        #[arg(short, long)]
        currency: Option<String>,
        /// Opening balance (e.g. "1000.00")
        #[arg(short, long, default_value = "0")]
        balance: String,
        /// Make this the default account
        #[arg(long)]
        default: bool,
    },
    /// Choose the account that receives quick-add income and pays bills
    SetDefault {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub async fn handle_account_command(
    storage: &Storage,
    default_currency: &str,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    let service = AccountService::from_storage(storage);

    match cmd {
        AccountCommands::List => {
            let accounts = service.list().await?;
            print!("{}", format_account_list(&accounts));
        }

        AccountCommands::Add {
            name,
            currency,
            balance,
            default,
        } => {
            let balance = parse_money(&balance)?;
            let currency = currency.unwrap_or_else(|| default_currency.to_string());
            let account = service.create(&name, &currency, balance, default).await?;

            println!("Created account: {}", account.name);
            println!("  Currency: {}", account.currency);
            println!("  Balance:  {}", account.balance);
            if account.is_default {
                println!("  Default:  yes");
            }
            println!("  ID: {}", account.id);
        }

        AccountCommands::SetDefault { account } => {
            let account = service.set_default(&account).await?;
            println!("Default account: {}", account.name);
        }
    }

    Ok(())
}
