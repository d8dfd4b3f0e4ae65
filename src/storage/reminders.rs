//! Reminder schedule persistence
//!
//! The schedule is replaced wholesale on every sync, so this repository has
//! no per-record operations.

use std::path::PathBuf;

use crate::error::LedgerResult;
use crate::models::Reminder;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReminderData {
    #[serde(default)]
    reminders: Vec<Reminder>,
}

/// Repository for the computed reminder schedule
pub struct ReminderRepository {
    path: PathBuf,
}

impl ReminderRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The schedule written by the last sync
    pub fn load(&self) -> LedgerResult<Vec<Reminder>> {
        let data: ReminderData = read_json(&self.path)?;
        Ok(data.reminders)
    }

    /// Replace the stored schedule
    pub fn replace(&self, reminders: &[Reminder]) -> LedgerResult<()> {
        write_json_atomic(
            &self.path,
            &ReminderData {
                reminders: reminders.to_vec(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillId, Money, ReminderKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_replace_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ReminderRepository::new(temp_dir.path().join("reminders.json"));
        assert!(repo.load().unwrap().is_empty());

        let reminder = Reminder {
            bill_id: BillId::new(),
            bill_title: "Rent".into(),
            section: "standard".into(),
            remind_on: NaiveDate::from_ymd_opt(2025, 1, 29).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            amount: Money::from_cents(120000),
            currency: "USD".into(),
            kind: ReminderKind::Alert,
            channel_key: None,
            sound_key: None,
        };
        repo.replace(std::slice::from_ref(&reminder)).unwrap();
        assert_eq!(repo.load().unwrap(), vec![reminder]);

        repo.replace(&[]).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }
}
