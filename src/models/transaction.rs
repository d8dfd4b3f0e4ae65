//! Transaction model
//!
//! A single expense or income entry. Amounts are always non-negative; the
//! direction comes from the transaction type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, BillId, CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction (also used to type categories)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// Parse from a user-supplied string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" | "out" => Some(Self::Expense),
            "income" | "in" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyTitle,
    NonPositiveAmount,
    InvalidCurrency(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Transaction title cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
            Self::InvalidCurrency(code) => {
                write!(f, "Currency must be a 3-letter ISO code, got '{}'", code)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Check that a currency code looks like an ISO 4217 code
pub fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub title: String,

    /// Always non-negative; direction comes from `transaction_type`
    pub amount: Money,

    /// ISO currency code; `None` means "use the configured default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub category_id: Option<CategoryId>,

    pub account_id: Option<AccountId>,

    /// Set when this transaction pays a bill
    pub bill_id: Option<BillId>,

    /// Local date and time of the transaction
    pub transaction_date: NaiveDateTime,

    #[serde(default)]
    pub is_cleared: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        title: impl Into<String>,
        transaction_type: TransactionType,
        amount: Money,
        transaction_date: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            title: title.into(),
            amount,
            currency: None,
            transaction_type,
            category_id: None,
            account_id: None,
            bill_id: None,
            transaction_date,
            is_cleared: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an expense
    pub fn expense(title: impl Into<String>, amount: Money, date: NaiveDateTime) -> Self {
        Self::new(title, TransactionType::Expense, amount, date)
    }

    /// Create an income entry
    pub fn income(title: impl Into<String>, amount: Money, date: NaiveDateTime) -> Self {
        Self::new(title, TransactionType::Income, amount, date)
    }

    /// Builder: set the currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Builder: set the category
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Builder: set the account
    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// The calendar date of this transaction
    pub fn date(&self) -> NaiveDate {
        self.transaction_date.date()
    }

    /// The transaction's own currency, or `default` when it has none
    pub fn currency_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(default)
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Mark the transaction as cleared
    pub fn clear(&mut self) {
        self.is_cleared = true;
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.title.trim().is_empty() {
            return Err(TransactionValidationError::EmptyTitle);
        }

        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount);
        }

        if let Some(code) = &self.currency {
            if !is_valid_currency(code) {
                return Err(TransactionValidationError::InvalidCurrency(code.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.transaction_date.format("%Y-%m-%d %H:%M"),
            self.title,
            self.amount,
            self.transaction_type
        )
    }
}
