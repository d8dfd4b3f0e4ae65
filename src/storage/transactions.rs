//! Transaction and bill repository for JSON storage
//!
//! Transactions live in transactions.json and bills in bills.json. Both are
//! served through the `TransactionStore` contract.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Bill, BillId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::TransactionStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BillData {
    bills: Vec<Bill>,
}

/// Repository for transaction and bill persistence
pub struct TransactionRepository {
    transactions_path: PathBuf,
    bills_path: PathBuf,
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
    bills: RwLock<HashMap<BillId, Bill>>,
}

impl TransactionRepository {
    pub fn new(transactions_path: PathBuf, bills_path: PathBuf) -> Self {
        Self {
            transactions_path,
            bills_path,
            transactions: RwLock::new(HashMap::new()),
            bills: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions and bills from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: TransactionData = read_json(&self.transactions_path)?;
        let bill_data: BillData = read_json(&self.bills_path)?;

        let mut transactions = self.transactions.write().map_err(lock_error)?;
        transactions.clear();
        for txn in file_data.transactions {
            transactions.insert(txn.id, txn);
        }

        let mut bills = self.bills.write().map_err(lock_error)?;
        bills.clear();
        for bill in bill_data.bills {
            bills.insert(bill.id, bill);
        }

        debug!(
            transactions = transactions.len(),
            bills = bills.len(),
            "loaded transactions and bills"
        );
        Ok(())
    }

    fn save_transactions(&self) -> LedgerResult<()> {
        let data = self.transactions.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then(a.created_at.cmp(&b.created_at))
        });

        write_json_atomic(&self.transactions_path, &TransactionData { transactions })
    }

    fn save_bills(&self) -> LedgerResult<()> {
        let bills = self.sorted_bills(|_| true)?;
        write_json_atomic(&self.bills_path, &BillData { bills })
    }

    fn sorted_bills(&self, keep: impl Fn(&Bill) -> bool) -> LedgerResult<Vec<Bill>> {
        let data = self.bills.read().map_err(lock_error)?;

        let mut bills: Vec<_> = data.values().filter(|b| keep(b)).cloned().collect();
        bills.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.title.cmp(&b.title)));
        Ok(bills)
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn transactions(&self) -> LedgerResult<Vec<Transaction>> {
        let data = self.transactions.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }

    async fn create_transaction(&self, transaction: Transaction) -> LedgerResult<Transaction> {
        {
            let mut data = self.transactions.write().map_err(lock_error)?;
            data.insert(transaction.id, transaction.clone());
        }
        self.save_transactions()?;
        Ok(transaction)
    }

    async fn bills(&self) -> LedgerResult<Vec<Bill>> {
        self.sorted_bills(|_| true)
    }

    async fn active_bills(&self) -> LedgerResult<Vec<Bill>> {
        self.sorted_bills(|b| b.is_active)
    }

    async fn bill(&self, id: BillId) -> LedgerResult<Option<Bill>> {
        let data = self.bills.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    async fn create_bill(&self, bill: Bill) -> LedgerResult<Bill> {
        {
            let mut data = self.bills.write().map_err(lock_error)?;
            data.insert(bill.id, bill.clone());
        }
        self.save_bills()?;
        Ok(bill)
    }

    async fn update_bill(&self, bill: Bill) -> LedgerResult<Bill> {
        {
            let mut data = self.bills.write().map_err(lock_error)?;
            if !data.contains_key(&bill.id) {
                return Err(LedgerError::bill_not_found(bill.id.to_string()));
            }
            data.insert(bill.id, bill.clone());
        }
        self.save_bills()?;
        Ok(bill)
    }
}
