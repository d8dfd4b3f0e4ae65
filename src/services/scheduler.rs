//! Bill reminder scheduling
//!
//! The [`NotificationScheduler`] contract rebuilds the full reminder schedule
//! from current bills and notification profiles. [`LocalReminderScheduler`]
//! computes reminders locally and persists them; delivering them is left to
//! whatever reads reminders.json.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, info};

use crate::error::LedgerResult;
use crate::models::{Bill, BillId, BillNotificationProfile, Reminder, ReminderKind};
use crate::storage::{NotificationProfileStore, ReminderRepository, Storage, TransactionStore};

/// Result of one schedule rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub scheduled: usize,
    pub cancelled: usize,
    /// Reminder counts keyed by template key
    pub scheduled_by_section: BTreeMap<String, usize>,
}

/// Rebuilds the reminder schedule
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn sync_schedules(&self) -> LedgerResult<SyncReport>;
}

/// Reminder kind used when a profile sets no override
pub const DEFAULT_REMINDER_KIND: ReminderKind = ReminderKind::Alert;

/// Scheduler that writes computed reminders to local storage
pub struct LocalReminderScheduler {
    bills: Arc<dyn TransactionStore>,
    profiles: Arc<dyn NotificationProfileStore>,
    reminders: Arc<ReminderRepository>,
    horizon_days: u32,
    today: Option<NaiveDate>,
}

impl LocalReminderScheduler {
    pub fn new(
        bills: Arc<dyn TransactionStore>,
        profiles: Arc<dyn NotificationProfileStore>,
        reminders: Arc<ReminderRepository>,
        horizon_days: u32,
    ) -> Self {
        Self {
            bills,
            profiles,
            reminders,
            horizon_days,
            today: None,
        }
    }

    pub fn from_storage(storage: &Storage, horizon_days: u32) -> Self {
        Self::new(
            storage.transactions.clone(),
            storage.profiles.clone(),
            storage.reminders.clone(),
            horizon_days,
        )
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Reminders written by the last sync, soonest first
    pub fn pending(&self) -> LedgerResult<Vec<Reminder>> {
        self.reminders.load()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Reminders for `bills` given their profiles, as of `today`
    pub fn compute(
        &self,
        bills: &[Bill],
        profiles: &HashMap<BillId, BillNotificationProfile>,
        today: NaiveDate,
    ) -> Vec<Reminder> {
        let horizon_end = today
            .checked_add_signed(Duration::days(self.horizon_days as i64))
            .unwrap_or(NaiveDate::MAX);

        let mut reminders: Vec<Reminder> = bills
            .iter()
            .filter(|bill| bill.is_outstanding())
            .filter_map(|bill| {
                let profile = profiles
                    .get(&bill.id)
                    .cloned()
                    .unwrap_or_else(|| BillNotificationProfile::default_for(bill.id));
                let template = profile.template();
                let remind_on = bill
                    .due_date
                    .checked_sub_signed(Duration::days(template.lead_days()))?;
                if remind_on < today || remind_on > horizon_end {
                    return None;
                }
                Some(Reminder {
                    bill_id: bill.id,
                    bill_title: bill.title.clone(),
                    section: template.key().to_string(),
                    remind_on,
                    due_date: bill.due_date,
                    amount: bill.amount,
                    currency: bill.currency.clone(),
                    kind: profile.type_override.unwrap_or(DEFAULT_REMINDER_KIND),
                    channel_key: profile.channel_key,
                    sound_key: profile.sound_key,
                })
            })
            .collect();

        reminders.sort_by(|a, b| {
            a.remind_on
                .cmp(&b.remind_on)
                .then_with(|| a.bill_title.cmp(&b.bill_title))
        });
        reminders
    }
}

#[async_trait]
impl NotificationScheduler for LocalReminderScheduler {
    async fn sync_schedules(&self) -> LedgerResult<SyncReport> {
        let bills = self.bills.active_bills().await?;
        let profiles = self.profiles.load_all().await?;
        let today = self.today();

        let reminders = self.compute(&bills, &profiles, today);
        let previous = self.reminders.load()?;

        let current: HashSet<_> = reminders.iter().map(Reminder::key).collect();
        let cancelled = previous
            .iter()
            .filter(|r| !current.contains(&r.key()))
            .count();

        let mut scheduled_by_section = BTreeMap::new();
        for reminder in &reminders {
            *scheduled_by_section
                .entry(reminder.section.clone())
                .or_insert(0) += 1;
        }

        self.reminders.replace(&reminders)?;

        debug!(bills = bills.len(), profiles = profiles.len(), "computed reminders");
        info!(
            scheduled = reminders.len(),
            cancelled, "reminder schedule rebuilt"
        );

        Ok(SyncReport {
            scheduled: reminders.len(),
            cancelled,
            scheduled_by_section,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::{NotificationProfileRepository, TransactionRepository};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _temp_dir: TempDir,
        bills: Arc<TransactionRepository>,
        profiles: Arc<NotificationProfileRepository>,
        scheduler: LocalReminderScheduler,
    }

    fn fixture(today: NaiveDate) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let bills = Arc::new(TransactionRepository::new(
            temp_dir.path().join("transactions.json"),
            temp_dir.path().join("bills.json"),
        ));
        let profiles = Arc::new(NotificationProfileRepository::new(
            temp_dir.path().join("notification_profiles.json"),
        ));
        let reminders = Arc::new(ReminderRepository::new(temp_dir.path().join("reminders.json")));
        let scheduler =
            LocalReminderScheduler::new(bills.clone(), profiles.clone(), reminders, 30)
                .with_today(today);
        Fixture {
            _temp_dir: temp_dir,
            bills,
            profiles,
            scheduler,
        }
    }

    fn bill(title: &str, due: NaiveDate) -> Bill {
        Bill::new(title, Money::from_cents(5000), "USD", due)
    }

    #[tokio::test]
    async fn test_default_template_three_days_ahead() {
        let f = fixture(date(2025, 3, 1));
        f.bills.create_bill(bill("Rent", date(2025, 3, 10))).await.unwrap();

        let report = f.scheduler.sync_schedules().await.unwrap();
        assert_eq!(report.scheduled, 1);
        assert_eq!(report.scheduled_by_section.get("standard"), Some(&1));

        let pending = f.scheduler.pending().unwrap();
        assert_eq!(pending[0].remind_on, date(2025, 3, 7));
        assert_eq!(pending[0].kind, ReminderKind::Alert);
    }

    #[tokio::test]
    async fn test_profile_changes_section_and_kind() {
        let f = fixture(date(2025, 3, 1));
        let water = f.bills.create_bill(bill("Water", date(2025, 3, 20))).await.unwrap();

        let mut profile = BillNotificationProfile::default_for(water.id);
        profile.template_key = "early".into();
        profile.type_override = Some(ReminderKind::Alarm);
        f.profiles.save_profile(profile).await.unwrap();

        let report = f.scheduler.sync_schedules().await.unwrap();
        assert_eq!(report.scheduled_by_section.get("early"), Some(&1));

        let pending = f.scheduler.pending().unwrap();
        assert_eq!(pending[0].remind_on, date(2025, 3, 13));
        assert_eq!(pending[0].kind, ReminderKind::Alarm);
    }

    #[tokio::test]
    async fn test_skips_past_far_and_settled_bills() {
        let f = fixture(date(2025, 3, 1));
        // reminder date already passed
        f.bills.create_bill(bill("Phone", date(2025, 3, 2))).await.unwrap();
        // beyond the horizon
        f.bills.create_bill(bill("Insurance", date(2025, 6, 1))).await.unwrap();
        let mut paid = bill("Car", date(2025, 3, 15));
        paid.is_paid = true;
        f.bills.create_bill(paid).await.unwrap();

        let report = f.scheduler.sync_schedules().await.unwrap();
        assert_eq!(report.scheduled, 0);
        assert!(report.scheduled_by_section.is_empty());
    }

    #[tokio::test]
    async fn test_counts_cancelled_reminders() {
        let f = fixture(date(2025, 3, 1));
        let gym = f.bills.create_bill(bill("Gym", date(2025, 3, 10))).await.unwrap();
        f.bills.create_bill(bill("Power", date(2025, 3, 12))).await.unwrap();
        assert_eq!(f.scheduler.sync_schedules().await.unwrap().scheduled, 2);

        let mut gym = gym;
        gym.is_active = false;
        f.bills.update_bill(gym).await.unwrap();

        let report = f.scheduler.sync_schedules().await.unwrap();
        assert_eq!(report.scheduled, 1);
        assert_eq!(report.cancelled, 1);
    }

    #[test]
    fn test_compute_ignores_profiles_for_other_bills() {
        let f = fixture(date(2025, 3, 1));
        let rent = bill("Rent", date(2025, 3, 10));
        let mut profiles = HashMap::new();
        let mut stray = BillNotificationProfile::default_for(BillId::new());
        stray.template_key = "day_of".into();
        profiles.insert(stray.bill_id, stray);

        let reminders = f.scheduler.compute(&[rent], &profiles, date(2025, 3, 1));
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].section, "standard");
    }
}
