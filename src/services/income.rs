//! Income hub
//!
//! Quick-add for one-off income, recurring income definitions and the
//! summary shown on the income screen. The hub owns its `LoadState` and
//! refreshes it when the recurring income store reports a change.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, CategoryId, DateRange, Money, RecurringIncome, Transaction, TransactionType,
};
use crate::storage::{AccountStore, CategoryStore, RecurringIncomeStore, Storage, TransactionStore};

use super::aggregation::{CurrencyTotals, TransactionAggregator};
use super::recurring::{RecurringProjector, RecurringSummary};
use super::view_state::{Liveness, LoadState};

/// How many recent income entries the overview lists
const RECENT_LIMIT: usize = 5;

/// Input for a one-off income entry
#[derive(Debug, Clone)]
pub struct QuickIncome {
    /// Falls back to the category name when blank
    pub title: String,
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub received_at: NaiveDateTime,
}

/// A recorded quick-add
#[derive(Debug, Clone)]
pub struct QuickIncomeAdded {
    pub transaction: Transaction,
    /// The default account after being credited
    pub account: Account,
}

/// What the income screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeOverview {
    pub recurring: RecurringSummary,
    /// Income received this calendar month, per currency
    pub month_received: CurrencyTotals,
    /// Latest income transactions, newest first
    pub recent: Vec<Transaction>,
}

/// Income screen logic
pub struct IncomeHub {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    categories: Arc<dyn CategoryStore>,
    recurring: Arc<dyn RecurringIncomeStore>,
    aggregator: TransactionAggregator,
    projector: RecurringProjector,
    horizon_days: u32,
    changes: watch::Receiver<u64>,
    liveness: Liveness,
    state: LoadState<IncomeOverview>,
}

impl IncomeHub {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        accounts: Arc<dyn AccountStore>,
        categories: Arc<dyn CategoryStore>,
        recurring: Arc<dyn RecurringIncomeStore>,
        default_currency: &str,
        horizon_days: u32,
    ) -> Self {
        let changes = recurring.subscribe();
        Self {
            transactions,
            accounts,
            categories,
            recurring,
            aggregator: TransactionAggregator::new(default_currency),
            projector: RecurringProjector::new(),
            horizon_days,
            changes,
            liveness: Liveness::new(),
            state: LoadState::Idle,
        }
    }

    pub fn from_storage(storage: &Storage, default_currency: &str, horizon_days: u32) -> Self {
        Self::new(
            storage.transactions.clone(),
            storage.accounts.clone(),
            storage.categories.clone(),
            storage.recurring.clone(),
            default_currency,
            horizon_days,
        )
    }

    pub fn state(&self) -> &LoadState<IncomeOverview> {
        &self.state
    }

    /// Handle the owner ends when it is torn down
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Record a one-off income and credit the default account.
    ///
    /// Nothing is written unless the amount is positive, an income
    /// category is chosen and a default account exists.
    pub async fn quick_add(&self, input: QuickIncome) -> LedgerResult<QuickIncomeAdded> {
        if !input.amount.is_positive() {
            return Err(LedgerError::Validation(
                "Amount must be greater than zero".into(),
            ));
        }

        let category_id = input
            .category_id
            .ok_or_else(|| LedgerError::Validation("Choose an income category".into()))?;
        let category = self
            .categories
            .categories()
            .await?
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;
        if category.category_type != TransactionType::Income {
            return Err(LedgerError::Validation(format!(
                "'{}' is not an income category",
                category.name
            )));
        }

        let mut account = self.accounts.default_account().await?.ok_or_else(|| {
            LedgerError::Validation("No default account to receive the income".into())
        })?;

        let title = match input.title.trim() {
            "" => category.name.clone(),
            t => t.to_string(),
        };
        let mut transaction = Transaction::income(title, input.amount, input.received_at)
            .with_currency(account.currency.clone())
            .with_category(category.id)
            .with_account(account.id);
        transaction.clear();

        let transaction = self.transactions.create_transaction(transaction).await?;
        account.credit(input.amount);
        let account = self.accounts.update_account(account).await?;

        info!(
            amount = %transaction.amount,
            category = %category.name,
            account = %account.name,
            "income added"
        );
        Ok(QuickIncomeAdded {
            transaction,
            account,
        })
    }

    /// Validate and store a recurring income definition
    pub async fn save_recurring(&self, income: RecurringIncome) -> LedgerResult<RecurringIncome> {
        income
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.recurring.upsert(income.clone()).await?;
        info!(title = %income.title, frequency = %income.frequency, "recurring income saved");
        Ok(income)
    }

    /// All recurring definitions
    pub async fn recurring(&self) -> LedgerResult<Vec<RecurringIncome>> {
        self.recurring.all().await
    }

    /// Recurring summary as of `today`
    pub async fn summary(&self, today: NaiveDate) -> LedgerResult<RecurringSummary> {
        let incomes = self.recurring.all().await?;
        Ok(self.projector.summarize(&incomes, today, self.horizon_days))
    }

    /// Everything the income screen shows
    pub async fn overview(&self, today: NaiveDate) -> LedgerResult<IncomeOverview> {
        let recurring = self.summary(today).await?;

        let transactions = self.transactions.transactions().await?;
        let first = today.with_day(1).unwrap_or(today);
        let month = DateRange::whole_days(first, today);
        let received = self.aggregator.filter(
            &transactions,
            &month,
            TransactionType::Income.into(),
            None,
        );

        let recent = transactions
            .into_iter()
            .filter(Transaction::is_income)
            .take(RECENT_LIMIT)
            .collect();

        Ok(IncomeOverview {
            recurring,
            month_received: self.aggregator.totals_by_currency(&received),
            recent,
        })
    }

    /// Reload the overview into the hub's state. A result that arrives
    /// after the owner ended is dropped.
    pub async fn refresh(&mut self, today: NaiveDate) -> &LoadState<IncomeOverview> {
        self.state = LoadState::Loading;
        let result = self.overview(today).await;

        let state = &mut self.state;
        let applied = self
            .liveness
            .apply(result, |result| *state = LoadState::from_result(result));
        if !applied {
            debug!("income refresh finished after teardown, discarded");
        }
        &self.state
    }

    /// Wait until the recurring income store changes. Returns false once the
    /// store has gone away.
    pub async fn wait_for_change(&mut self) -> bool {
        self.changes.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, TransactionCategory};
    use crate::storage::{AccountRepository, CategoryRepository, RecurringIncomeRepository, TransactionRepository};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _temp_dir: TempDir,
        accounts: Arc<AccountRepository>,
        transactions: Arc<TransactionRepository>,
        recurring: Arc<RecurringIncomeRepository>,
        salary: TransactionCategory,
        groceries: TransactionCategory,
        hub: IncomeHub,
    }

    async fn fixture(with_default_account: bool) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let transactions = Arc::new(TransactionRepository::new(
            dir.join("transactions.json"),
            dir.join("bills.json"),
        ));
        let accounts = Arc::new(AccountRepository::new(dir.join("accounts.json")));
        let categories = Arc::new(CategoryRepository::new(dir.join("categories.json")));
        let recurring = Arc::new(RecurringIncomeRepository::new(dir.join("recurring_income.json")));

        let salary = TransactionCategory::new("Salary", TransactionType::Income);
        let groceries = TransactionCategory::new("Groceries", TransactionType::Expense);
        categories.upsert(salary.clone()).await.unwrap();
        categories.upsert(groceries.clone()).await.unwrap();

        if with_default_account {
            let mut main = Account::new("Main", "USD");
            main.is_default = true;
            accounts.upsert(main).await.unwrap();
        }

        let hub = IncomeHub::new(
            transactions.clone(),
            accounts.clone(),
            categories,
            recurring.clone(),
            "USD",
            30,
        );
        Fixture {
            _temp_dir: temp_dir,
            accounts,
            transactions,
            recurring,
            salary,
            groceries,
            hub,
        }
    }

    fn quick(amount: i64, category_id: Option<CategoryId>) -> QuickIncome {
        QuickIncome {
            title: String::new(),
            amount: Money::from_cents(amount),
            category_id,
            received_at: date(2025, 3, 3).and_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_quick_add_credits_default_account() {
        let f = fixture(true).await;
        let added = f.hub.quick_add(quick(250000, Some(f.salary.id))).await.unwrap();

        assert_eq!(added.transaction.title, "Salary");
        assert!(added.transaction.is_cleared);
        assert_eq!(added.transaction.currency.as_deref(), Some("USD"));
        assert_eq!(added.account.balance.cents(), 250000);

        let stored = f.accounts.default_account().await.unwrap().unwrap();
        assert_eq!(stored.balance.cents(), 250000);
        assert_eq!(f.transactions.transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quick_add_validation_writes_nothing() {
        let f = fixture(true).await;

        let zero = f.hub.quick_add(quick(0, Some(f.salary.id))).await.unwrap_err();
        assert!(zero.is_validation());

        let missing = f.hub.quick_add(quick(100, None)).await.unwrap_err();
        assert!(missing.is_validation());

        let expense = f.hub.quick_add(quick(100, Some(f.groceries.id))).await.unwrap_err();
        assert!(expense.is_validation());

        let unknown = f.hub.quick_add(quick(100, Some(CategoryId::new()))).await.unwrap_err();
        assert!(unknown.is_not_found());

        assert!(f.transactions.transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quick_add_requires_default_account() {
        let f = fixture(false).await;
        let err = f.hub.quick_add(quick(100, Some(f.salary.id))).await.unwrap_err();
        assert!(err.is_validation());
        assert!(f.transactions.transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_recurring_rejects_end_before_start() {
        let f = fixture(true).await;
        let income = RecurringIncome::new(
            "Rent from tenant",
            Money::from_cents(90000),
            "USD",
            Frequency::Monthly,
            date(2025, 3, 1),
        )
        .ending(date(2025, 2, 1));

        let err = f.hub.save_recurring(income).await.unwrap_err();
        assert!(err.is_validation());
        assert!(f.hub.recurring().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_change_notification() {
        let mut f = fixture(true).await;
        let today = date(2025, 3, 10);

        let state = f.hub.refresh(today).await;
        assert_eq!(state.value().unwrap().recurring.active_count, 0);

        f.recurring
            .upsert(RecurringIncome::new(
                "Salary",
                Money::from_cents(300000),
                "USD",
                Frequency::Monthly,
                date(2025, 1, 25),
            ))
            .await
            .unwrap();

        assert!(f.hub.wait_for_change().await);
        let overview = f.hub.refresh(today).await.value().cloned().unwrap();
        assert_eq!(overview.recurring.active_count, 1);
        assert_eq!(overview.recurring.monthly_totals["USD"].cents(), 300000);
        assert_eq!(overview.recurring.upcoming[0].date, date(2025, 3, 25));
    }

    #[tokio::test]
    async fn test_refresh_discarded_after_teardown() {
        let mut f = fixture(true).await;
        f.hub.liveness().end();

        let state = f.hub.refresh(date(2025, 3, 10)).await;
        assert!(state.is_loading());
    }

    #[tokio::test]
    async fn test_overview_month_received() {
        let f = fixture(true).await;
        f.hub.quick_add(quick(5000, Some(f.salary.id))).await.unwrap();

        let overview = f.hub.overview(date(2025, 3, 20)).await.unwrap();
        assert_eq!(overview.month_received["USD"].cents(), 5000);
        assert_eq!(overview.recent.len(), 1);

        let next_month = f.hub.overview(date(2025, 4, 2)).await.unwrap();
        assert!(next_month.month_received.is_empty());
    }
}
