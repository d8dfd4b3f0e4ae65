//! Account service
//!
//! Provides business logic for money accounts: creation, lookup and
//! choosing the default account that quick-add flows post to.

use std::sync::Arc;

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Money};
use crate::storage::{AccountStore, Storage};

/// Service for account management
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.accounts.clone())
    }

    /// All accounts, default first
    pub async fn list(&self) -> LedgerResult<Vec<Account>> {
        self.accounts.accounts().await
    }

    pub async fn default_account(&self) -> LedgerResult<Option<Account>> {
        self.accounts.default_account().await
    }

    /// Find an account by name (case-insensitive) or id
    pub async fn find(&self, identifier: &str) -> LedgerResult<Option<Account>> {
        let identifier = identifier.trim();
        let accounts = self.list().await?;

        if let Some(account) = accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(account.clone()));
        }

        Ok(accounts.into_iter().find(|a| a.id.matches_ref(identifier)))
    }

    /// Create an account. The first account ever created becomes the default.
    pub async fn create(
        &self,
        name: &str,
        currency: &str,
        opening_balance: Money,
        make_default: bool,
    ) -> LedgerResult<Account> {
        let name = name.trim();
        let existing = self.list().await?;

        if existing.iter().any(|a| a.name.eq_ignore_ascii_case(name)) {
            return Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::new(name, currency.trim().to_uppercase());
        account.balance = opening_balance;
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let first = existing.is_empty();
        self.accounts.upsert(account.clone()).await?;
        if first || make_default {
            self.accounts.set_default(account.id).await?;
            account.is_default = true;
        }

        info!(name = %account.name, currency = %account.currency, "account created");
        Ok(account)
    }

    /// Make the named account the default
    pub async fn set_default(&self, identifier: &str) -> LedgerResult<Account> {
        let mut account = self
            .find(identifier)
            .await?
            .ok_or_else(|| LedgerError::account_not_found(identifier))?;

        self.accounts.set_default(account.id).await?;
        account.is_default = true;
        info!(name = %account.name, "default account changed");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AccountRepository;
    use tempfile::TempDir;

    fn service() -> (TempDir, AccountService) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, AccountService::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn test_first_account_becomes_default() {
        let (_temp_dir, service) = service();
        let wallet = service
            .create("Wallet", "usd", Money::from_cents(1000), false)
            .await
            .unwrap();
        assert!(wallet.is_default);
        assert_eq!(wallet.currency, "USD");

        let bank = service.create("Bank", "USD", Money::zero(), false).await.unwrap();
        assert!(!bank.is_default);

        let default = service.default_account().await.unwrap().unwrap();
        assert_eq!(default.id, wallet.id);
    }

    #[tokio::test]
    async fn test_set_default_by_name() {
        let (_temp_dir, service) = service();
        service.create("Wallet", "USD", Money::zero(), false).await.unwrap();
        let bank = service.create("Bank", "EUR", Money::zero(), false).await.unwrap();

        service.set_default("bank").await.unwrap();
        assert_eq!(service.default_account().await.unwrap().unwrap().id, bank.id);

        let err = service.set_default("Savings").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_currency_rejected() {
        let (_temp_dir, service) = service();
        let err = service
            .create("Wallet", "dollars", Money::zero(), false)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
