//! Recurring income repository
//!
//! Handles persistence of recurring income definitions to
//! recurring_income.json and publishes a revision number on every write so
//! readers can refresh without polling.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{RecurringIncome, RecurringIncomeId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::RecurringIncomeStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecurringData {
    #[serde(default)]
    incomes: Vec<RecurringIncome>,
}

/// Repository for recurring income definitions
pub struct RecurringIncomeRepository {
    path: PathBuf,
    incomes: RwLock<HashMap<RecurringIncomeId, RecurringIncome>>,
    revision: watch::Sender<u64>,
}

impl RecurringIncomeRepository {
    pub fn new(path: PathBuf) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            path,
            incomes: RwLock::new(HashMap::new()),
            revision,
        }
    }

    /// Load definitions from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: RecurringData = read_json(&self.path)?;

        let mut incomes = self.incomes.write().map_err(lock_error)?;
        incomes.clear();
        for income in file_data.incomes {
            incomes.insert(income.id, income);
        }

        debug!(count = incomes.len(), "loaded recurring incomes");
        Ok(())
    }

    /// Save definitions to disk
    pub fn save(&self) -> LedgerResult<()> {
        let incomes = self.sorted(|_| true)?;
        write_json_atomic(&self.path, &RecurringData { incomes })
    }

    fn sorted(&self, keep: impl Fn(&RecurringIncome) -> bool) -> LedgerResult<Vec<RecurringIncome>> {
        let incomes = self.incomes.read().map_err(lock_error)?;

        let mut list: Vec<_> = incomes.values().filter(|i| keep(i)).cloned().collect();
        list.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(list)
    }
}

#[async_trait]
impl RecurringIncomeStore for RecurringIncomeRepository {
    async fn all(&self) -> LedgerResult<Vec<RecurringIncome>> {
        self.sorted(|_| true)
    }

    async fn active(&self) -> LedgerResult<Vec<RecurringIncome>> {
        self.sorted(|i| i.is_active)
    }

    async fn currently_active(&self, today: NaiveDate) -> LedgerResult<Vec<RecurringIncome>> {
        self.sorted(|i| i.is_currently_active(today))
    }

    async fn upsert(&self, income: RecurringIncome) -> LedgerResult<()> {
        {
            let mut incomes = self.incomes.write().map_err(lock_error)?;
            incomes.insert(income.id, income);
        }
        self.save()?;
        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Money};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn salary(start: NaiveDate) -> RecurringIncome {
        RecurringIncome::new("Salary", Money::from_cents(300000), "USD", Frequency::Monthly, start)
    }

    #[tokio::test]
    async fn test_upsert_bumps_revision() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RecurringIncomeRepository::new(temp_dir.path().join("recurring_income.json"));
        repo.load().unwrap();

        let mut rx = repo.subscribe();
        assert_eq!(*rx.borrow_and_update(), 0);

        repo.upsert(salary(date(2025, 1, 1))).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn test_active_filters() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RecurringIncomeRepository::new(temp_dir.path().join("recurring_income.json"));

        let mut paused = salary(date(2025, 1, 1));
        paused.is_active = false;
        repo.upsert(paused).await.unwrap();
        repo.upsert(salary(date(2025, 1, 1)).ending(date(2025, 3, 31)))
            .await
            .unwrap();
        repo.upsert(salary(date(2025, 6, 1))).await.unwrap();

        assert_eq!(repo.all().await.unwrap().len(), 3);
        assert_eq!(repo.active().await.unwrap().len(), 2);

        let current = repo.currently_active(date(2025, 2, 15)).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].end_date, Some(date(2025, 3, 31)));
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recurring_income.json");
        let repo = RecurringIncomeRepository::new(path.clone());
        repo.upsert(salary(date(2025, 1, 1))).await.unwrap();

        let repo2 = RecurringIncomeRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.all().await.unwrap().len(), 1);
    }
}
