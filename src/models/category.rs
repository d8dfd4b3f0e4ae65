//! Transaction category model
//!
//! Categories are typed (expense or income) so the quick-add flows and
//! reports only offer the ones that make sense for the direction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionType;

/// Color used for categories that have none (mid grey, ARGB)
pub const DEFAULT_CATEGORY_COLOR: u32 = 0xFF9E9E9E;

/// A category for transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCategory {
    pub id: CategoryId,

    pub name: String,

    /// ARGB color value
    pub color_value: u32,

    /// Icon reference (a name from the app's icon set)
    #[serde(default)]
    pub icon: String,

    #[serde(rename = "type")]
    pub category_type: TransactionType,

    /// Seeded at init; cannot be renamed away by the user
    #[serde(default)]
    pub is_system_category: bool,

    #[serde(default)]
    pub sort_order: i32,

    pub created_at: DateTime<Utc>,
}

impl TransactionCategory {
    /// Create a new user category
    pub fn new(name: impl Into<String>, category_type: TransactionType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color_value: DEFAULT_CATEGORY_COLOR,
            icon: String::from("category"),
            category_type,
            is_system_category: false,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    /// Create a seeded system category
    pub fn system(
        name: impl Into<String>,
        category_type: TransactionType,
        icon: &str,
        color_value: u32,
        sort_order: i32,
    ) -> Self {
        Self {
            icon: icon.to_string(),
            color_value,
            is_system_category: true,
            sort_order,
            ..Self::new(name, category_type)
        }
    }

    /// Display placeholder for a category id that no longer resolves
    pub fn unknown(category_type: TransactionType) -> Self {
        Self {
            icon: String::from("help"),
            ..Self::new("Unknown", category_type)
        }
    }

    /// Display placeholder for transactions without a category
    pub fn other(category_type: TransactionType) -> Self {
        Self {
            icon: String::from("more_horiz"),
            ..Self::new("Other", category_type)
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Default categories created by `init`
pub fn default_categories() -> Vec<TransactionCategory> {
    let expense = [
        ("Housing", "home", 0xFF5C6BC0),
        ("Groceries", "shopping_cart", 0xFF66BB6A),
        ("Transport", "directions_car", 0xFF42A5F5),
        ("Utilities", "bolt", 0xFFFFA726),
        ("Dining Out", "restaurant", 0xFFEF5350),
        ("Health", "favorite", 0xFFEC407A),
        ("Entertainment", "movie", 0xFFAB47BC),
        ("Subscriptions", "subscriptions", 0xFF26A69A),
    ];
    let income = [
        ("Salary", "work", 0xFF43A047),
        ("Freelance", "laptop", 0xFF1E88E5),
        ("Investments", "trending_up", 0xFF8E24AA),
        ("Gifts", "card_giftcard", 0xFFF4511E),
    ];

    let mut categories = Vec::with_capacity(expense.len() + income.len());
    for (i, (name, icon, color)) in expense.into_iter().enumerate() {
        categories.push(TransactionCategory::system(
            name,
            TransactionType::Expense,
            icon,
            color,
            i as i32,
        ));
    }
    for (i, (name, icon, color)) in income.into_iter().enumerate() {
        categories.push(TransactionCategory::system(
            name,
            TransactionType::Income,
            icon,
            color,
            i as i32,
        ));
    }
    categories
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
