//! Bill service
//!
//! Creates and edits bills. Every persisted change is followed by a silent,
//! coalesced reminder resync; the write is always awaited first.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::is_valid_currency;
use crate::models::{Account, Bill, BillId, Transaction, TransactionType};
use crate::storage::{AccountStore, Storage, TransactionStore};

use super::sync::{ScheduleSync, SyncMode, SyncOutcome};

/// A persisted bill change and the resync it triggered
#[derive(Debug, Clone)]
pub struct BillSaved {
    pub bill: Bill,
    pub sync: SyncOutcome,
}

/// Result of paying a bill
#[derive(Debug, Clone)]
pub struct BillPaid {
    pub transaction: Transaction,
    /// The bill after payment (rolled over when repeating)
    pub bill: Bill,
    pub sync: SyncOutcome,
}

/// Service for bill management
pub struct BillService {
    bills: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    sync: Arc<ScheduleSync>,
}

impl BillService {
    pub fn new(
        bills: Arc<dyn TransactionStore>,
        accounts: Arc<dyn AccountStore>,
        sync: Arc<ScheduleSync>,
    ) -> Self {
        Self {
            bills,
            accounts,
            sync,
        }
    }

    pub fn from_storage(storage: &Storage, sync: Arc<ScheduleSync>) -> Self {
        Self::new(storage.transactions.clone(), storage.accounts.clone(), sync)
    }

    /// All bills ordered by due date
    pub async fn list(&self) -> LedgerResult<Vec<Bill>> {
        self.bills.bills().await
    }

    /// Find a bill by title (case-insensitive) or id
    pub async fn find(&self, identifier: &str) -> LedgerResult<Option<Bill>> {
        let identifier = identifier.trim();
        let bills = self.list().await?;

        if let Some(bill) = bills
            .iter()
            .find(|b| b.title.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(bill.clone()));
        }

        Ok(bills.into_iter().find(|b| b.id.matches_ref(identifier)))
    }

    /// Outstanding bills due on or before `today + within_days`, overdue
    /// ones included
    pub async fn due(&self, today: NaiveDate, within_days: i64) -> LedgerResult<Vec<Bill>> {
        Ok(self
            .bills
            .active_bills()
            .await?
            .into_iter()
            .filter(|b| b.is_outstanding() && b.days_until_due(today) <= within_days)
            .collect())
    }

    /// Validate and store a new bill
    pub async fn create(&self, bill: Bill) -> LedgerResult<BillSaved> {
        validate_bill(&bill)?;
        let bill = self.bills.create_bill(bill).await?;
        info!(bill = %bill.id, title = %bill.title, "bill created");

        let sync = self.sync.request(SyncMode::Silent).await?;
        Ok(BillSaved { bill, sync })
    }

    /// Persist an edited bill, then request a resync
    pub async fn save_change(&self, bill: Bill) -> LedgerResult<BillSaved> {
        validate_bill(&bill)?;
        let bill = self.bills.update_bill(bill).await?;
        debug!(bill = %bill.id, "bill updated");

        let sync = self.sync.request(SyncMode::Silent).await?;
        Ok(BillSaved { bill, sync })
    }

    /// Record a payment: the bill moves to its next due date (or is marked
    /// paid), then an expense is recorded against the bill's account or the
    /// default account.
    ///
    /// The bill is written first so a failed bill write records nothing. If
    /// recording the expense fails, the bill is put back as it was.
    pub async fn pay(&self, bill_id: BillId, paid_at: NaiveDateTime) -> LedgerResult<BillPaid> {
        let original = self
            .bills
            .bill(bill_id)
            .await?
            .ok_or_else(|| LedgerError::bill_not_found(bill_id.to_string()))?;

        if !original.is_outstanding() {
            return Err(LedgerError::Validation(format!(
                "Bill '{}' is not awaiting payment",
                original.title
            )));
        }

        let account = match original.account_id {
            Some(id) => self
                .accounts
                .accounts()
                .await?
                .into_iter()
                .find(|a| a.id == id)
                .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?,
            None => self.accounts.default_account().await?.ok_or_else(|| {
                LedgerError::Validation("No default account to pay the bill from".into())
            })?,
        };

        let mut paid = original.clone();
        paid.mark_paid();
        let bill = self.bills.update_bill(paid).await?;

        let transaction = match self.record_payment(&original, account, paid_at).await {
            Ok(transaction) => transaction,
            Err(e) => {
                if let Err(restore) = self.bills.update_bill(original).await {
                    warn!(bill = %bill_id, error = %restore, "could not restore unpaid bill");
                }
                return Err(e);
            }
        };
        info!(bill = %bill_id, amount = %transaction.amount, "bill paid");

        let sync = self.sync.request(SyncMode::Silent).await?;
        Ok(BillPaid {
            transaction,
            bill,
            sync,
        })
    }

    async fn record_payment(
        &self,
        bill: &Bill,
        mut account: Account,
        paid_at: NaiveDateTime,
    ) -> LedgerResult<Transaction> {
        let mut transaction =
            Transaction::new(bill.title.clone(), TransactionType::Expense, bill.amount, paid_at)
                .with_currency(bill.currency.clone())
                .with_account(account.id);
        transaction.category_id = bill.category_id;
        transaction.bill_id = Some(bill.id);
        transaction.clear();

        let transaction = self.bills.create_transaction(transaction).await?;
        account.debit(bill.amount);
        self.accounts.update_account(account).await?;
        Ok(transaction)
    }
}

fn validate_bill(bill: &Bill) -> LedgerResult<()> {
    if bill.title.trim().is_empty() {
        return Err(LedgerError::Validation("Bill title cannot be empty".into()));
    }
    if !bill.amount.is_positive() {
        return Err(LedgerError::Validation(
            "Bill amount must be greater than zero".into(),
        ));
    }
    if !is_valid_currency(&bill.currency) {
        return Err(LedgerError::Validation(format!(
            "Invalid currency code '{}'",
            bill.currency
        )));
    }
    Ok(())
}
