//! Transaction aggregation
//!
//! Pure functions over transaction snapshots: filtering by type, range and
//! currency, then summing per currency, day, weekday or category. Nothing
//! here converts between currencies; every total is keyed by currency code.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::models::{
    CategoryId, DateRange, Money, Transaction, TransactionCategory, TransactionType,
};

/// Group key used for transactions without a category
pub const UNCATEGORIZED_KEY: &str = "uncategorized";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Sums keyed by currency code
pub type CurrencyTotals = BTreeMap<String, Money>;

/// Which transaction types a filter keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    pub fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => *t == transaction_type,
        }
    }
}

impl From<TransactionType> for TypeFilter {
    fn from(t: TransactionType) -> Self {
        Self::Only(t)
    }
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub totals: CurrencyTotals,
    pub count: usize,
}

/// Totals for one day of the week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayTotal {
    pub weekday: Weekday,
    pub totals: CurrencyTotals,
    pub count: usize,
}

/// Key of a category group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Category(CategoryId),
    Uncategorized,
}

impl CategoryKey {
    fn of(transaction: &Transaction) -> Self {
        transaction
            .category_id
            .map_or(Self::Uncategorized, Self::Category)
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(id) => write!(f, "{}", id),
            Self::Uncategorized => write!(f, "{}", UNCATEGORIZED_KEY),
        }
    }
}

/// Transactions sharing a category key
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub key: CategoryKey,
    pub transactions: Vec<Transaction>,
}

/// One slice of a category breakdown
#[derive(Debug, Clone)]
pub struct CategorySlice {
    /// The resolved category, or an `Unknown` / `Other` placeholder
    pub category: TransactionCategory,
    pub is_placeholder: bool,
    pub key: CategoryKey,
    /// Sum of amounts across the slice
    pub amount: Money,
    pub totals: CurrencyTotals,
    pub count: usize,
    /// Percentage of the breakdown total (0-100)
    pub share: f64,
}

/// Aggregates transactions for the report dashboards
#[derive(Debug, Clone)]
pub struct TransactionAggregator {
    default_currency: String,
}

impl TransactionAggregator {
    /// `default_currency` keys transactions that carry no currency
    pub fn new(default_currency: impl Into<String>) -> Self {
        Self {
            default_currency: default_currency.into(),
        }
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// The currency a transaction is counted under
    pub fn effective_currency<'a>(&'a self, transaction: &'a Transaction) -> &'a str {
        transaction.currency_or(&self.default_currency)
    }

    /// Keep transactions inside `range` whose type matches `type_filter` and,
    /// when given, whose effective currency equals `currency`. Input order
    /// is preserved.
    pub fn filter(
        &self,
        transactions: &[Transaction],
        range: &DateRange,
        type_filter: TypeFilter,
        currency: Option<&str>,
    ) -> Vec<Transaction> {
        let kept: Vec<Transaction> = transactions
            .iter()
            .filter(|t| range.contains(t.transaction_date))
            .filter(|t| type_filter.matches(t.transaction_type))
            .filter(|t| currency.map_or(true, |c| self.effective_currency(t) == c))
            .cloned()
            .collect();

        debug!(
            input = transactions.len(),
            kept = kept.len(),
            range = %range,
            "filtered transactions"
        );
        kept
    }

    /// Sum of amounts per currency
    pub fn totals_by_currency(&self, transactions: &[Transaction]) -> CurrencyTotals {
        let mut totals = CurrencyTotals::new();
        for t in transactions {
            self.add_to(&mut totals, t);
        }
        totals
    }

    /// One entry per calendar day of `range`, empty days included
    pub fn daily_totals(&self, transactions: &[Transaction], range: &DateRange) -> Vec<DailyTotal> {
        let mut days: Vec<DailyTotal> = range
            .days()
            .map(|date| DailyTotal {
                date,
                totals: CurrencyTotals::new(),
                count: 0,
            })
            .collect();

        let first = range.start_date();
        for t in transactions.iter().filter(|t| range.contains(t.transaction_date)) {
            let offset = (t.date() - first).num_days();
            if let Some(day) = usize::try_from(offset).ok().and_then(|i| days.get_mut(i)) {
                self.add_to(&mut day.totals, t);
                day.count += 1;
            }
        }
        days
    }

    /// Seven buckets, Monday through Sunday
    pub fn weekday_totals(&self, transactions: &[Transaction]) -> Vec<WeekdayTotal> {
        let mut buckets: Vec<WeekdayTotal> = WEEK
            .into_iter()
            .map(|weekday| WeekdayTotal {
                weekday,
                totals: CurrencyTotals::new(),
                count: 0,
            })
            .collect();

        for t in transactions {
            let index = t.date().weekday().num_days_from_monday() as usize;
            if let Some(bucket) = buckets.get_mut(index) {
                self.add_to(&mut bucket.totals, t);
                bucket.count += 1;
            }
        }
        buckets
    }

    /// Group by category, keeping the order in which each key first appears
    pub fn group_by_category(&self, transactions: &[Transaction]) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = Vec::new();
        let mut index: HashMap<CategoryKey, usize> = HashMap::new();

        for t in transactions {
            let key = CategoryKey::of(t);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(CategoryGroup {
                    key,
                    transactions: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].transactions.push(t.clone());
        }
        groups
    }

    /// Per-category totals and shares, largest first.
    ///
    /// Ids that no longer resolve are shown as `Unknown`, transactions
    /// without a category as `Other`. Amounts are summed as-is, so filter
    /// to one currency first for meaningful shares.
    pub fn category_breakdown(
        &self,
        transactions: &[Transaction],
        categories: &[TransactionCategory],
    ) -> Vec<CategorySlice> {
        let by_id: HashMap<CategoryId, &TransactionCategory> =
            categories.iter().map(|c| (c.id, c)).collect();

        let mut slices: Vec<CategorySlice> = self
            .group_by_category(transactions)
            .into_iter()
            .map(|group| {
                let category_type = group
                    .transactions
                    .first()
                    .map_or(TransactionType::Expense, |t| t.transaction_type);
                let (category, is_placeholder) = match group.key {
                    CategoryKey::Category(id) => match by_id.get(&id) {
                        Some(c) => ((*c).clone(), false),
                        None => (TransactionCategory::unknown(category_type), true),
                    },
                    CategoryKey::Uncategorized => (TransactionCategory::other(category_type), true),
                };
                CategorySlice {
                    category,
                    is_placeholder,
                    key: group.key,
                    amount: group.transactions.iter().map(|t| t.amount).sum(),
                    totals: self.totals_by_currency(&group.transactions),
                    count: group.transactions.len(),
                    share: 0.0,
                }
            })
            .collect();

        let total: Money = slices.iter().map(|s| s.amount).sum();
        for slice in &mut slices {
            slice.share = slice.amount.percent_of(total);
        }

        slices.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.name.cmp(&b.category.name))
        });
        slices
    }

    /// Each currency total spread evenly over the days of `range`
    pub fn daily_average(&self, totals: &CurrencyTotals, range: &DateRange) -> CurrencyTotals {
        let days = range.total_days();
        totals
            .iter()
            .map(|(currency, amount)| (currency.clone(), amount.div_round(days)))
            .collect()
    }

    fn add_to(&self, totals: &mut CurrencyTotals, transaction: &Transaction) {
        *totals
            .entry(self.effective_currency(transaction).to_string())
            .or_default() += transaction.amount;
    }
}
