//! Report summary
//!
//! Everything the expense and income dashboards show for one period: totals
//! per currency, the daily series, weekday buckets and the category
//! breakdown.

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::display::chart::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::error::LedgerResult;
use crate::models::{DateRange, Money, ReportPeriod, Transaction, TransactionCategory, TransactionType};
use crate::services::{
    CategorySlice, CurrencyTotals, DailyTotal, RangeResolver, TransactionAggregator, WeekdayTotal,
};
use crate::storage::{CategoryStore, TransactionStore};

const WIDTH: usize = 64;
const BAR_WIDTH: usize = 20;

/// What to report on
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub transaction_type: TransactionType,
    pub period: ReportPeriod,
    pub anchor: NaiveDate,
    /// Periods to move the anchor by (negative goes back)
    pub shift: i32,
    /// Only count transactions in this currency
    pub currency: Option<String>,
}

impl ReportQuery {
    pub fn new(transaction_type: TransactionType, period: ReportPeriod, anchor: NaiveDate) -> Self {
        Self {
            transaction_type,
            period,
            anchor,
            shift: 0,
            currency: None,
        }
    }
}

/// Aggregated view of one report period
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub transaction_type: TransactionType,
    pub period: ReportPeriod,
    pub range: DateRange,
    /// Currency the breakdown and charts are drawn in
    pub currency: String,
    pub totals: CurrencyTotals,
    pub daily: Vec<DailyTotal>,
    pub daily_average: CurrencyTotals,
    pub weekdays: Vec<WeekdayTotal>,
    pub categories: Vec<CategorySlice>,
    /// Biggest transaction in the chart currency
    pub largest: Option<Transaction>,
    pub transaction_count: usize,
}

impl ReportSummary {
    /// Load snapshots from the stores and build the summary
    pub async fn generate(
        transactions: &dyn TransactionStore,
        categories: &dyn CategoryStore,
        aggregator: &TransactionAggregator,
        query: &ReportQuery,
        now: NaiveDateTime,
    ) -> LedgerResult<Self> {
        let transactions = transactions.transactions().await?;
        let categories = categories.categories().await?;
        Ok(Self::build(aggregator, query, now, &transactions, &categories))
    }

    /// Build the summary from snapshots already in memory
    pub fn build(
        aggregator: &TransactionAggregator,
        query: &ReportQuery,
        now: NaiveDateTime,
        transactions: &[Transaction],
        categories: &[TransactionCategory],
    ) -> Self {
        let range =
            RangeResolver::new().resolve_shifted(query.anchor, query.period, query.shift, now);
        let filtered = aggregator.filter(
            transactions,
            &range,
            query.transaction_type.into(),
            query.currency.as_deref(),
        );

        let totals = aggregator.totals_by_currency(&filtered);
        let currency = query
            .currency
            .clone()
            .or_else(|| {
                totals
                    .iter()
                    .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                    .map(|(c, _)| c.clone())
            })
            .unwrap_or_else(|| aggregator.default_currency().to_string());

        let in_currency: Vec<Transaction> = filtered
            .iter()
            .filter(|t| aggregator.effective_currency(t) == currency)
            .cloned()
            .collect();

        // amounts only compare within one currency
        let largest = in_currency
            .iter()
            .max_by(|a, b| {
                a.amount
                    .cmp(&b.amount)
                    .then_with(|| a.transaction_date.cmp(&b.transaction_date))
            })
            .cloned();

        debug!(
            range = %range,
            kind = %query.transaction_type,
            count = filtered.len(),
            "report summary built"
        );

        Self {
            transaction_type: query.transaction_type,
            period: query.period,
            daily: aggregator.daily_totals(&filtered, &range),
            daily_average: aggregator.daily_average(&totals, &range),
            weekdays: aggregator.weekday_totals(&filtered),
            categories: aggregator.category_breakdown(&in_currency, categories),
            transaction_count: filtered.len(),
            range,
            currency,
            totals,
            largest,
        }
    }

    /// Total in the chart currency
    pub fn total(&self) -> Money {
        self.totals.get(&self.currency).copied().unwrap_or_default()
    }

    /// Currencies that appear in the totals, or the chart currency alone
    fn currencies(&self) -> Vec<String> {
        if self.totals.is_empty() {
            vec![self.currency.clone()]
        } else {
            self.totals.keys().cloned().collect()
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let title = match self.transaction_type {
            TransactionType::Expense => "Expense Report",
            TransactionType::Income => "Income Report",
        };

        output.push_str(&format!("{}: {} ({})\n", title, self.period, self.range));
        output.push_str(&double_separator(WIDTH));
        output.push('\n');

        if self.transaction_count == 0 {
            output.push_str("No transactions in this period.\n");
            return output;
        }

        for (currency, amount) in &self.totals {
            let average = self.daily_average.get(currency).copied().unwrap_or_default();
            output.push_str(&format!(
                "Total {:<4} {:>14}   daily average {:>12}\n",
                currency, amount, average
            ));
        }
        output.push_str(&format!("Transactions: {}\n", self.transaction_count));
        if let Some(largest) = &self.largest {
            output.push_str(&format!(
                "Largest:      {} {} {} on {}\n",
                truncate(&largest.title, 24),
                self.currency,
                largest.amount,
                largest.date()
            ));
        }

        // Category breakdown
        output.push_str(&format!("\nBy category ({})\n", self.currency));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        let max_slice = self.categories.iter().map(|s| s.amount).max().unwrap_or_default();
        for slice in &self.categories {
            output.push_str(&format!(
                "{:<18} {:>12} {} {:>6}\n",
                truncate(&slice.category.name, 18),
                slice.amount,
                format_bar(slice.amount, max_slice, BAR_WIDTH),
                format_percentage(slice.share)
            ));
        }

        // Weekday buckets
        output.push_str(&format!("\nBy weekday ({})\n", self.currency));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        let weekday_amount = |w: &WeekdayTotal| w.totals.get(&self.currency).copied().unwrap_or_default();
        let max_weekday = self.weekdays.iter().map(weekday_amount).max().unwrap_or_default();
        for bucket in &self.weekdays {
            let amount = weekday_amount(bucket);
            output.push_str(&format!(
                "{:<18} {:>12} {}\n",
                bucket.weekday.to_string(),
                amount,
                format_bar(amount, max_weekday, BAR_WIDTH)
            ));
        }

        // Days with activity
        output.push_str(&format!("\nDaily ({})\n", self.currency));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        let day_amount = |d: &DailyTotal| d.totals.get(&self.currency).copied().unwrap_or_default();
        let max_day = self.daily.iter().map(day_amount).max().unwrap_or_default();
        for day in self.daily.iter().filter(|d| d.count > 0) {
            let amount = day_amount(day);
            output.push_str(&format!(
                "{:<18} {:>12} {}\n",
                day.date.format("%Y-%m-%d %a").to_string(),
                amount,
                format_bar(amount, max_day, BAR_WIDTH)
            ));
        }

        output
    }

    /// Write the full daily series as CSV, one column per currency
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let currencies = self.currencies();
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["date".to_string()];
        header.extend(currencies.iter().cloned());
        header.push("transactions".to_string());
        csv.write_record(&header)?;

        for day in &self.daily {
            let mut record = vec![day.date.format("%Y-%m-%d").to_string()];
            record.extend(currencies.iter().map(|c| {
                day.totals.get(c).copied().unwrap_or_default().to_string()
            }));
            record.push(day.count.to_string());
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32) -> NaiveDateTime {
        d.and_hms_opt(h, 0, 0).unwrap()
    }

    fn expense(title: &str, cents: i64, currency: &str, when: NaiveDateTime) -> Transaction {
        Transaction::expense(title, Money::from_cents(cents), when).with_currency(currency)
    }

    fn month_query() -> ReportQuery {
        ReportQuery::new(TransactionType::Expense, ReportPeriod::Month, date(2025, 3, 15))
    }

    #[test]
    fn test_single_expense_totals() {
        let aggregator = TransactionAggregator::new("USD");
        let day1 = date(2025, 3, 1);
        let txns = vec![expense("Groceries", 5000, "USD", at(day1, 10))];
        let query = ReportQuery::new(TransactionType::Expense, ReportPeriod::Day, day1);

        let summary = ReportSummary::build(&aggregator, &query, at(day1, 20), &txns, &[]);
        assert_eq!(summary.totals.get("USD"), Some(&Money::from_cents(5000)));
        assert_eq!(summary.totals.len(), 1);
        assert_eq!(summary.daily.len(), 1);
        assert_eq!(summary.transaction_count, 1);
    }

    #[test]
    fn test_month_summary() {
        let aggregator = TransactionAggregator::new("USD");
        let txns = vec![
            expense("Rent", 90000, "USD", at(date(2025, 3, 1), 9)),
            expense("Coffee", 450, "USD", at(date(2025, 3, 3), 8)),
            expense("Train", 2000, "EUR", at(date(2025, 3, 3), 18)),
            expense("Old", 100, "USD", at(date(2025, 2, 28), 12)),
            Transaction::income("Salary", Money::from_cents(300000), at(date(2025, 3, 1), 9)),
        ];

        let summary =
            ReportSummary::build(&aggregator, &month_query(), at(date(2025, 3, 20), 0), &txns, &[]);

        assert_eq!(summary.daily.len(), 31);
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.currency, "USD");
        assert_eq!(summary.total(), Money::from_cents(90450));
        assert_eq!(summary.totals.get("EUR"), Some(&Money::from_cents(2000)));
        assert_eq!(summary.largest.as_ref().map(|t| t.title.as_str()), Some("Rent"));

        // breakdown only covers the chart currency
        let counted: usize = summary.categories.iter().map(|s| s.count).sum();
        assert_eq!(counted, 2);

        let monday = &summary.weekdays[0];
        assert_eq!(monday.weekday, chrono::Weekday::Mon);
        assert_eq!(monday.totals.get("USD"), Some(&Money::from_cents(450)));
        assert_eq!(monday.totals.get("EUR"), Some(&Money::from_cents(2000)));
    }

    #[test]
    fn test_largest_stays_in_chart_currency() {
        let aggregator = TransactionAggregator::new("USD");
        let txns = vec![
            expense("Ramen", 5000, "JPY", at(date(2025, 3, 4), 12)),
            expense("Books", 4000, "USD", at(date(2025, 3, 5), 12)),
            expense("Lunch", 1500, "USD", at(date(2025, 3, 6), 12)),
        ];

        let summary =
            ReportSummary::build(&aggregator, &month_query(), at(date(2025, 3, 20), 0), &txns, &[]);
        assert_eq!(summary.currency, "USD");
        assert_eq!(summary.largest.as_ref().map(|t| t.title.as_str()), Some("Books"));

        let mut query = month_query();
        query.currency = Some("JPY".into());
        let summary = ReportSummary::build(&aggregator, &query, at(date(2025, 3, 20), 0), &txns, &[]);
        assert_eq!(summary.largest.as_ref().map(|t| t.title.as_str()), Some("Ramen"));
    }

    #[test]
    fn test_currency_filter_and_shift() {
        let aggregator = TransactionAggregator::new("USD");
        let txns = vec![
            expense("Train", 2000, "EUR", at(date(2025, 2, 3), 18)),
            expense("Coffee", 450, "USD", at(date(2025, 2, 3), 8)),
        ];
        let mut query = month_query();
        query.shift = -1;
        query.currency = Some("EUR".into());

        let summary = ReportSummary::build(&aggregator, &query, at(date(2025, 3, 20), 0), &txns, &[]);
        assert_eq!(summary.range.start_date(), date(2025, 2, 1));
        assert_eq!(summary.range.end_date(), date(2025, 2, 28));
        assert_eq!(summary.currency, "EUR");
        assert_eq!(summary.transaction_count, 1);
        assert!(summary.totals.get("USD").is_none());
    }

    #[test]
    fn test_export_csv_has_every_day() {
        let aggregator = TransactionAggregator::new("USD");
        let txns = vec![expense("Coffee", 450, "USD", at(date(2025, 3, 3), 8))];
        let summary =
            ReportSummary::build(&aggregator, &month_query(), at(date(2025, 3, 20), 0), &txns, &[]);

        let mut out = Vec::new();
        summary.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "date,USD,transactions");
        assert_eq!(lines.len(), 32);
        assert_eq!(lines[3], "2025-03-03,4.50,1");
        assert_eq!(lines[1], "2025-03-01,0.00,0");
    }

    #[test]
    fn test_format_terminal_empty() {
        let aggregator = TransactionAggregator::new("USD");
        let summary =
            ReportSummary::build(&aggregator, &month_query(), at(date(2025, 3, 20), 0), &[], &[]);
        let text = summary.format_terminal();
        assert!(text.starts_with("Expense Report: Month"));
        assert!(text.contains("No transactions in this period."));
    }

    #[test]
    fn test_format_terminal_lists_categories() {
        let aggregator = TransactionAggregator::new("USD");
        let groceries = TransactionCategory::new("Groceries", TransactionType::Expense);
        let mut txn = expense("Market", 5000, "USD", at(date(2025, 3, 3), 8));
        txn.category_id = Some(groceries.id);

        let summary = ReportSummary::build(
            &aggregator,
            &month_query(),
            at(date(2025, 3, 20), 0),
            &[txn],
            &[groceries],
        );
        let text = summary.format_terminal();
        assert!(text.contains("Groceries"));
        assert!(text.contains("100%"));
        assert!(text.contains("2025-03-03 Mon"));
    }
}
