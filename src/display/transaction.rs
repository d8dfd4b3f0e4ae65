//! Transaction display formatting

use std::collections::HashMap;

use crate::models::{CategoryId, Transaction, TransactionType};

use super::chart::truncate;

/// Format transactions as a register, newest first as given
pub fn format_transaction_register(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:2} {:16} {:24} {:16} {:>14}\n",
        "St", "Date", "Title", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(76));
    output.push('\n');

    for txn in transactions {
        let status = if txn.is_cleared { "✓" } else { " " };
        let category = txn
            .category_id
            .and_then(|id| category_names.get(&id))
            .map(String::as_str)
            .unwrap_or("-");
        let sign = match txn.transaction_type {
            TransactionType::Expense => "-",
            TransactionType::Income => "+",
        };
        let amount = format!("{}{}", sign, txn.amount);

        output.push_str(&format!(
            "{:2} {:16} {:24} {:16} {:>14} {}\n",
            status,
            txn.transaction_date.format("%Y-%m-%d %H:%M").to_string(),
            truncate(&txn.title, 24),
            truncate(category, 16),
            amount,
            txn.currency.as_deref().unwrap_or("")
        ));
    }

    output
}
