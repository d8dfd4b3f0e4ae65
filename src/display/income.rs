//! Recurring income formatting

use chrono::NaiveDate;

use crate::models::RecurringIncome;
use crate::services::RecurringSummary;

use super::chart::truncate;

/// Format recurring incomes as a table
pub fn format_recurring_list(incomes: &[RecurringIncome], today: NaiveDate) -> String {
    if incomes.is_empty() {
        return "No recurring income set up.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:>14} {:<10} {:<10} {}\n",
        "Title", "Amount", "Every", "Since", "Status"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for income in incomes {
        let status = if income.is_currently_active(today) {
            "active"
        } else if income.has_ended(today) {
            "ended"
        } else {
            "inactive"
        };
        output.push_str(&format!(
            "{:<24} {:>14} {:<10} {:<10} {}\n",
            truncate(&income.title, 24),
            income.amount.format_with_currency(&income.currency),
            income.frequency.to_string(),
            income.start_date.format("%Y-%m-%d").to_string(),
            status
        ));
    }
    output
}

/// Format the monthly/yearly totals and upcoming payments
pub fn format_recurring_summary(summary: &RecurringSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Recurring income: {} active, {} inactive\n",
        summary.active_count, summary.inactive_count
    ));

    for (currency, monthly) in &summary.monthly_totals {
        let yearly = summary.yearly_totals.get(currency).copied().unwrap_or_default();
        output.push_str(&format!(
            "  {:<4} {:>12} / month {:>14} / year\n",
            currency, monthly, yearly
        ));
    }

    if summary.upcoming.is_empty() {
        output.push_str("\nNo payments expected soon.\n");
    } else {
        output.push_str("\nUpcoming:\n");
        for payment in &summary.upcoming {
            output.push_str(&format!(
                "  {} {:<24} {}\n",
                payment.date.format("%Y-%m-%d"),
                truncate(&payment.title, 24),
                payment.amount.format_with_currency(&payment.currency)
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::UpcomingIncome;
    use crate::models::RecurringIncomeId;

    #[test]
    fn test_summary_lines() {
        let mut summary = RecurringSummary::default();
        summary.active_count = 1;
        summary
            .monthly_totals
            .insert("USD".into(), Money::from_cents(433000));
        summary
            .yearly_totals
            .insert("USD".into(), Money::from_cents(5196000));
        summary.upcoming.push(UpcomingIncome {
            income_id: RecurringIncomeId::new(),
            title: "Salary".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            amount: Money::from_cents(100000),
            currency: "USD".into(),
        });

        let output = format_recurring_summary(&summary);
        assert!(output.contains("1 active, 0 inactive"));
        assert!(output.contains("4330.00 / month"));
        assert!(output.contains("2025-03-07 Salary"));
    }
}
