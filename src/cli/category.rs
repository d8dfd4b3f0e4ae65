//! Category CLI commands

use clap::Subcommand;

use crate::display::category::format_category_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionType;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only show one type (expense or income)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// expense or income
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
    },
}

pub(crate) fn parse_type(s: &str) -> LedgerResult<TransactionType> {
    TransactionType::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!("Invalid type '{}'. Use expense or income", s))
    })
}

/// Handle a category command
pub async fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::from_storage(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => service.list_by_type(parse_type(&kind)?).await?,
                None => service.list().await?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name, kind } => {
            let category = service.create(&name, parse_type(&kind)?).await?;
            println!("Created {} category: {}", category.category_type, category.name);
            println!("  ID: {}", category.id);
        }
    }

    Ok(())
}
