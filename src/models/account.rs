//! Account model
//!
//! Accounts hold a running balance in a single currency. Exactly one
//! account is flagged as the default; quick-add flows post to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// A money account (wallet, bank account, card)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    pub name: String,

    /// ISO currency code of the balance
    pub currency: String,

    pub balance: Money,

    /// Target of quick-add flows
    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            currency: currency.into(),
            balance: Money::zero(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an income amount to the balance
    pub fn credit(&mut self, amount: Money) {
        self.balance += amount;
        self.updated_at = Utc::now();
    }

    /// Take an expense amount from the balance
    pub fn debit(&mut self, amount: Money) {
        self.balance -= amount;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if !super::transaction::is_valid_currency(&self.currency) {
            return Err(AccountValidationError::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    InvalidCurrency(String),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::InvalidCurrency(code) => {
                write!(f, "Account currency must be a 3-letter ISO code, got '{}'", code)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let mut account = Account::new("Wallet", "USD");
        account.credit(Money::from_cents(5000));
        account.debit(Money::from_cents(1250));
        assert_eq!(account.balance.cents(), 3750);
    }

    #[test]
    fn test_validation() {
        assert!(Account::new("Wallet", "USD").validate().is_ok());
        assert_eq!(
            Account::new(" ", "USD").validate(),
            Err(AccountValidationError::EmptyName)
        );
        assert!(matches!(
            Account::new("Wallet", "Dollar").validate(),
            Err(AccountValidationError::InvalidCurrency(_))
        ));
    }
}
