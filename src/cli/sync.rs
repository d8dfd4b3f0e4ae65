//! Sync CLI command

use std::sync::Arc;

use crate::config::Settings;
use crate::display::bill::format_reminder_list;
use crate::error::LedgerResult;
use crate::services::{LocalReminderScheduler, ScheduleSync, SyncMode, SyncOutcome};
use crate::storage::Storage;

/// Rebuild the reminder schedule now and show it
pub async fn handle_sync_command(storage: &Storage, settings: &Settings) -> LedgerResult<()> {
    let scheduler = Arc::new(LocalReminderScheduler::from_storage(
        storage,
        settings.reminder_horizon_days,
    ));
    let sync = ScheduleSync::new(scheduler.clone());

    if let SyncOutcome::Completed(report) = sync.request(SyncMode::Visible).await? {
        println!(
            "Reminders scheduled: {} (cancelled {})",
            report.scheduled, report.cancelled
        );
        for (section, count) in &report.scheduled_by_section {
            println!("  {:<10} {}", section, count);
        }
        println!();
    }

    print!("{}", format_reminder_list(&scheduler.pending()?));
    Ok(())
}
