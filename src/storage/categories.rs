//! Category repository for JSON storage
//!
//! Manages loading and saving transaction categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{CategoryId, TransactionCategory, TransactionType};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::traits::CategoryStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<TransactionCategory>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, TransactionCategory>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        debug!(count = data.len(), "loaded categories");
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> LedgerResult<()> {
        let categories = self.sorted()?;
        write_json_atomic(&self.path, &CategoryData { categories })
    }

    /// Number of stored categories
    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.data.read().map_err(lock_error)?.len())
    }

    fn sorted(&self) -> LedgerResult<Vec<TransactionCategory>> {
        let data = self.data.read().map_err(lock_error)?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| {
            type_rank(a.category_type)
                .cmp(&type_rank(b.category_type))
                .then(a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }
}

fn type_rank(category_type: TransactionType) -> u8 {
    match category_type {
        TransactionType::Expense => 0,
        TransactionType::Income => 1,
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn categories(&self) -> LedgerResult<Vec<TransactionCategory>> {
        self.sorted()
    }

    async fn upsert(&self, category: TransactionCategory) -> LedgerResult<()> {
        {
            let mut data = self.data.write().map_err(lock_error)?;
            data.insert(category.id, category);
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_categories_sorted_by_type_then_order() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo.load().unwrap();

        for category in default_categories().into_iter().rev() {
            repo.upsert(category).await.unwrap();
        }

        let categories = repo.categories().await.unwrap();
        let first_income = categories
            .iter()
            .position(|c| c.category_type == TransactionType::Income)
            .unwrap();
        assert!(categories[..first_income]
            .iter()
            .all(|c| c.category_type == TransactionType::Expense));
        assert!(categories[first_income..]
            .windows(2)
            .all(|w| w[0].sort_order <= w[1].sort_order));
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path.clone());

        let category = TransactionCategory::new("Side gigs", TransactionType::Income);
        let id = category.id;
        repo.upsert(category).await.unwrap();

        let repo2 = CategoryRepository::new(path);
        repo2.load().unwrap();
        let categories = repo2.categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, id);
    }
}
