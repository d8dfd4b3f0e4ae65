//! Collaborator contracts consumed by the service layer
//!
//! Services only see these traits. The JSON repositories in this module
//! implement them; tests substitute in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;

use crate::error::LedgerResult;
use crate::models::{
    Account, AccountId, Bill, BillId, BillNotificationProfile, RecurringIncome, Transaction,
    TransactionCategory,
};

/// Transactions and bills
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions, newest first
    async fn transactions(&self) -> LedgerResult<Vec<Transaction>>;

    async fn create_transaction(&self, transaction: Transaction) -> LedgerResult<Transaction>;

    /// All bills ordered by due date
    async fn bills(&self) -> LedgerResult<Vec<Bill>>;

    /// Active bills ordered by due date
    async fn active_bills(&self) -> LedgerResult<Vec<Bill>>;

    async fn bill(&self, id: BillId) -> LedgerResult<Option<Bill>>;

    async fn create_bill(&self, bill: Bill) -> LedgerResult<Bill>;

    /// Replace a stored bill; errors with not-found if it does not exist
    async fn update_bill(&self, bill: Bill) -> LedgerResult<Bill>;
}

/// Transaction categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories ordered by type then sort order
    async fn categories(&self) -> LedgerResult<Vec<TransactionCategory>>;

    async fn upsert(&self, category: TransactionCategory) -> LedgerResult<()>;
}

/// Money accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn accounts(&self) -> LedgerResult<Vec<Account>>;

    async fn default_account(&self) -> LedgerResult<Option<Account>>;

    async fn upsert(&self, account: Account) -> LedgerResult<()>;

    /// Replace a stored account; errors with not-found if it does not exist
    async fn update_account(&self, account: Account) -> LedgerResult<Account>;

    /// Make `id` the only default account
    async fn set_default(&self, id: AccountId) -> LedgerResult<()>;
}

/// Recurring income definitions with change notification
#[async_trait]
pub trait RecurringIncomeStore: Send + Sync {
    async fn all(&self) -> LedgerResult<Vec<RecurringIncome>>;

    /// Definitions with the active flag set
    async fn active(&self) -> LedgerResult<Vec<RecurringIncome>>;

    /// Active definitions that have started and not ended on `today`
    async fn currently_active(&self, today: NaiveDate) -> LedgerResult<Vec<RecurringIncome>>;

    async fn upsert(&self, income: RecurringIncome) -> LedgerResult<()>;

    /// Revision counter bumped after every write
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Sparse per-bill notification overrides
#[async_trait]
pub trait NotificationProfileStore: Send + Sync {
    async fn load_all(&self) -> LedgerResult<HashMap<BillId, BillNotificationProfile>>;

    async fn save_profile(&self, profile: BillNotificationProfile) -> LedgerResult<()>;

    /// Returns whether a profile was removed
    async fn remove_profile(&self, bill_id: BillId) -> LedgerResult<bool>;
}

/// Key-value store for hashed secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> LedgerResult<Option<String>>;

    async fn put(&self, key: &str, value: String) -> LedgerResult<()>;

    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> LedgerResult<bool>;

    async fn clear(&self) -> LedgerResult<()>;
}
