//! Bill, reminder and notification profile formatting

use chrono::NaiveDate;

use crate::models::{Bill, BillNotificationProfile, Reminder};

use super::chart::truncate;

/// Format bills as a table with their due status relative to `today`
pub fn format_bill_list(bills: &[Bill], today: NaiveDate) -> String {
    if bills.is_empty() {
        return "No bills found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10} {:<24} {:>14} {:<10} {:<10} {}\n",
        "Id", "Title", "Amount", "Due", "Repeats", "Status"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for bill in bills {
        let status = if !bill.is_active {
            "inactive".to_string()
        } else if bill.is_paid {
            "paid".to_string()
        } else {
            match bill.days_until_due(today) {
                d if d < 0 => format!("overdue {}d", -d),
                0 => "due today".to_string(),
                d => format!("in {}d", d),
            }
        };
        let repeats = bill
            .frequency
            .map(|f| f.to_string())
            .unwrap_or_else(|| "once".to_string());

        output.push_str(&format!(
            "{:<10} {:<24} {:>14} {:<10} {:<10} {}\n",
            bill.id.to_string(),
            truncate(&bill.title, 24),
            bill.amount.format_with_currency(&bill.currency),
            bill.due_date.format("%Y-%m-%d").to_string(),
            repeats,
            status
        ));
    }

    output
}

/// Format the computed reminder schedule, grouped by section
pub fn format_reminder_list(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No reminders scheduled.\n".to_string();
    }

    let mut sections: Vec<&str> = reminders.iter().map(|r| r.section.as_str()).collect();
    sections.sort_unstable();
    sections.dedup();

    let mut output = String::new();
    for section in sections {
        output.push_str(&format!("[{}]\n", section));
        for reminder in reminders.iter().filter(|r| r.section == section) {
            output.push_str(&format!("  {} [{}]\n", reminder, reminder.kind));
        }
    }
    output
}

/// Format stored notification profiles next to their bill titles
pub fn format_profile_list(profiles: &[(String, BillNotificationProfile)]) -> String {
    if profiles.is_empty() {
        return "All bills use the default notification profile.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:<10} {:<12} {:<12} {}\n",
        "Bill", "Template", "Channel", "Sound", "Type"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for (title, profile) in profiles {
        output.push_str(&format!(
            "{:<24} {:<10} {:<12} {:<12} {}\n",
            truncate(title, 24),
            profile.template_key,
            profile.channel_key.as_deref().unwrap_or("-"),
            profile.sound_key.as_deref().unwrap_or("-"),
            profile
                .type_override
                .map(|k| k.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    output
}
