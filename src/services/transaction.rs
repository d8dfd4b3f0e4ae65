//! Transaction service
//!
//! Records expenses and income entries, keeping the linked account balance
//! in step.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, CategoryId, Money, Transaction, TransactionType};
use crate::storage::{AccountStore, CategoryStore, Storage, TransactionStore};

/// Input for a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Money,
    pub transaction_type: TransactionType,
    /// Defaults to the account's currency, then to none
    pub currency: Option<String>,
    pub category_id: Option<CategoryId>,
    pub account_id: Option<AccountId>,
    pub transaction_date: NaiveDateTime,
    pub cleared: bool,
}

/// Service for transaction management
pub struct TransactionService {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    categories: Arc<dyn CategoryStore>,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        accounts: Arc<dyn AccountStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            transactions,
            accounts,
            categories,
        }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            storage.transactions.clone(),
            storage.accounts.clone(),
            storage.categories.clone(),
        )
    }

    /// All transactions, newest first
    pub async fn list(&self) -> LedgerResult<Vec<Transaction>> {
        self.transactions.transactions().await
    }

    /// Validate and record a transaction, updating the account balance
    pub async fn create(&self, input: NewTransaction) -> LedgerResult<Transaction> {
        if let Some(category_id) = input.category_id {
            let category = self
                .categories
                .categories()
                .await?
                .into_iter()
                .find(|c| c.id == category_id)
                .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;
            if category.category_type != input.transaction_type {
                return Err(LedgerError::Validation(format!(
                    "Category '{}' is for {} entries",
                    category.name, category.category_type
                )));
            }
        }

        let mut account = match input.account_id {
            Some(id) => Some(
                self.accounts
                    .accounts()
                    .await?
                    .into_iter()
                    .find(|a| a.id == id)
                    .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?,
            ),
            None => None,
        };

        let mut transaction = Transaction::new(
            input.title.trim(),
            input.transaction_type,
            input.amount,
            input.transaction_date,
        );
        transaction.currency = input
            .currency
            .map(|c| c.trim().to_uppercase())
            .or_else(|| account.as_ref().map(|a| a.currency.clone()));
        transaction.category_id = input.category_id;
        transaction.account_id = input.account_id;
        if input.cleared {
            transaction.clear();
        }
        transaction
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let transaction = self.transactions.create_transaction(transaction).await?;

        if let Some(account) = account.as_mut() {
            match transaction.transaction_type {
                TransactionType::Expense => account.debit(transaction.amount),
                TransactionType::Income => account.credit(transaction.amount),
            }
            self.accounts.update_account(account.clone()).await?;
        }

        info!(
            id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            "transaction recorded"
        );
        Ok(transaction)
    }
}
