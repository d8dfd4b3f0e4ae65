//! Category display formatting

use crate::models::{TransactionCategory, TransactionType};

/// Format categories split into expense and income sections
pub fn format_category_list(categories: &[TransactionCategory]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'lifeledger init' to create default categories."
            .to_string();
    }

    let mut output = String::new();
    for (heading, kind) in [
        ("Expense", TransactionType::Expense),
        ("Income", TransactionType::Income),
    ] {
        let section: Vec<&TransactionCategory> = categories
            .iter()
            .filter(|c| c.category_type == kind)
            .collect();
        if section.is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("{}\n", heading));
        for (i, category) in section.iter().enumerate() {
            let prefix = if i == section.len() - 1 { "└── " } else { "├── " };
            let system = if category.is_system_category { " (system)" } else { "" };
            output.push_str(&format!("  {}{}{}\n", prefix, category.name, system));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections() {
        let categories = vec![
            TransactionCategory::new("Groceries", TransactionType::Expense),
            TransactionCategory::new("Rent", TransactionType::Expense),
            TransactionCategory::new("Salary", TransactionType::Income),
        ];
        let output = format_category_list(&categories);

        let expense = output.find("Expense").unwrap();
        let income = output.find("Income").unwrap();
        assert!(expense < income);
        assert!(output.contains("├── Groceries"));
        assert!(output.contains("└── Rent"));
        assert!(output.contains("└── Salary"));
    }
}
