//! Storage layer for LifeLedger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Every repository implements one of the collaborator contracts
//! in [`traits`]; services hold them as trait objects.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod notifications;
pub mod recurring;
pub mod reminders;
pub mod secrets;
pub mod traits;
pub mod transactions;

use std::fmt::Display;
use std::sync::Arc;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, needs_initialization, InitSummary};
pub use notifications::NotificationProfileRepository;
pub use recurring::RecurringIncomeRepository;
pub use reminders::ReminderRepository;
pub use secrets::FileSecretStore;
pub use traits::{
    AccountStore, CategoryStore, NotificationProfileStore, RecurringIncomeStore, SecretStore,
    TransactionStore,
};
pub use transactions::TransactionRepository;

use crate::config::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};

/// Map a poisoned lock into a storage error
pub(crate) fn lock_error<E: Display>(e: E) -> LedgerError {
    LedgerError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub accounts: Arc<AccountRepository>,
    pub transactions: Arc<TransactionRepository>,
    pub categories: Arc<CategoryRepository>,
    pub recurring: Arc<RecurringIncomeRepository>,
    pub profiles: Arc<NotificationProfileRepository>,
    pub reminders: Arc<ReminderRepository>,
    pub secrets: Arc<FileSecretStore>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: Arc::new(AccountRepository::new(paths.accounts_file())),
            transactions: Arc::new(TransactionRepository::new(
                paths.transactions_file(),
                paths.bills_file(),
            )),
            categories: Arc::new(CategoryRepository::new(paths.categories_file())),
            recurring: Arc::new(RecurringIncomeRepository::new(paths.recurring_income_file())),
            profiles: Arc::new(NotificationProfileRepository::new(
                paths.notification_profiles_file(),
            )),
            reminders: Arc::new(ReminderRepository::new(paths.reminders_file())),
            secrets: Arc::new(FileSecretStore::new(paths.security_file())),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> LedgerResult<()> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.categories.load()?;
        self.recurring.load()?;
        self.profiles.load()?;
        self.secrets.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }
}
