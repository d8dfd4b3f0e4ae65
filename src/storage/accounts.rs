//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::AccountStore;

/// Serializable account data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        debug!(count = data.len(), "loaded accounts");
        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> LedgerResult<()> {
        let data = self.data.read().map_err(lock_error)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &AccountData { accounts })
    }

    /// Number of stored accounts
    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.data.read().map_err(lock_error)?.len())
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn accounts(&self) -> LedgerResult<Vec<Account>> {
        let data = self.data.read().map_err(lock_error)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(accounts)
    }

    async fn default_account(&self) -> LedgerResult<Option<Account>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|a| a.is_default).cloned())
    }

    async fn upsert(&self, account: Account) -> LedgerResult<()> {
        {
            let mut data = self.data.write().map_err(lock_error)?;
            data.insert(account.id, account);
        }
        self.save()
    }

    async fn update_account(&self, account: Account) -> LedgerResult<Account> {
        {
            let mut data = self.data.write().map_err(lock_error)?;
            if !data.contains_key(&account.id) {
                return Err(LedgerError::account_not_found(account.id.to_string()));
            }
            data.insert(account.id, account.clone());
        }
        self.save()?;
        Ok(account)
    }

    async fn set_default(&self, id: AccountId) -> LedgerResult<()> {
        {
            let mut data = self.data.write().map_err(lock_error)?;
            if !data.contains_key(&id) {
                return Err(LedgerError::account_not_found(id.to_string()));
            }
            for account in data.values_mut() {
                account.is_default = account.id == id;
            }
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let repo = AccountRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_persists() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut account = Account::new("Wallet", "USD");
        account.credit(Money::from_cents(2500));
        repo.upsert(account.clone()).await.unwrap();

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();
        let accounts = repo2.accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance.cents(), 2500);
    }

    #[tokio::test]
    async fn test_set_default_is_exclusive() {
        let (_temp_dir, repo) = create_test_repo();
        let mut first = Account::new("Wallet", "USD");
        first.is_default = true;
        let second = Account::new("Bank", "USD");
        let second_id = second.id;

        repo.upsert(first).await.unwrap();
        repo.upsert(second).await.unwrap();
        repo.set_default(second_id).await.unwrap();

        let default = repo.default_account().await.unwrap().unwrap();
        assert_eq!(default.id, second_id);
        let defaults = repo
            .accounts()
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.is_default)
            .count();
        assert_eq!(defaults, 1);
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo
            .update_account(Account::new("Ghost", "USD"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
