//! Storage initialization
//!
//! Handles first-run setup and default data creation

use tracing::info;

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerResult;
use crate::models::{default_categories, Account};

use super::traits::{AccountStore, CategoryStore};
use super::Storage;

/// What a call to [`initialize_storage`] created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSummary {
    pub categories_created: usize,
    pub default_account_created: bool,
}

/// Initialize storage for a fresh installation
///
/// Seeds the system categories when none exist and creates a default
/// account in the configured currency when there are no accounts. Existing
/// data is never overwritten.
pub async fn initialize_storage(storage: &Storage, settings: &Settings) -> LedgerResult<InitSummary> {
    storage.paths().ensure_directories()?;
    settings.save(storage.paths())?;

    let mut summary = InitSummary::default();

    if storage.categories.categories().await?.is_empty() {
        for category in default_categories() {
            storage.categories.upsert(category).await?;
            summary.categories_created += 1;
        }
    }

    if storage.accounts.accounts().await?.is_empty() {
        let mut account = Account::new("Main", settings.default_currency.clone());
        account.is_default = true;
        storage.accounts.upsert(account).await?;
        summary.default_account_created = true;
    }

    info!(
        categories = summary.categories_created,
        default_account = summary.default_account_created,
        "storage initialized"
    );
    Ok(summary)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionCategory, TransactionType};
    use tempfile::TempDir;

    fn open(temp_dir: &TempDir) -> Storage {
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        storage
    }

    #[tokio::test]
    async fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open(&temp_dir);
        assert!(needs_initialization(storage.paths()));

        let summary = initialize_storage(&storage, &Settings::default()).await.unwrap();

        assert!(!needs_initialization(storage.paths()));
        assert_eq!(summary.categories_created, default_categories().len());
        assert!(summary.default_account_created);
        assert!(storage.paths().settings_file().exists());

        let account = storage.accounts.default_account().await.unwrap().unwrap();
        assert_eq!(account.currency, "USD");
    }

    #[tokio::test]
    async fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open(&temp_dir);

        storage
            .categories
            .upsert(TransactionCategory::new("Custom", TransactionType::Expense))
            .await
            .unwrap();

        let summary = initialize_storage(&storage, &Settings::default()).await.unwrap();
        assert_eq!(summary.categories_created, 0);

        let reopened = open(&temp_dir);
        let categories = reopened.categories.categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Custom");

        let again = initialize_storage(&reopened, &Settings::default()).await.unwrap();
        assert!(!again.default_account_created);
    }
}
