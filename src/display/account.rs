//! Account display formatting

use crate::models::Account;

/// Format accounts with balances as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n\nRun 'lifeledger init' to create a default account."
            .to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>14}  {}\n",
        "Name",
        "Currency",
        "Balance",
        "Default",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:->14}  {:-<7}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>14}  {}\n",
            account.name,
            account.currency,
            account.balance.to_string(),
            if account.is_default { "*" } else { "" },
            name_width = name_width,
        ));
    }

    output
}
