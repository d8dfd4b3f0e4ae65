//! Category service
//!
//! Provides business logic for transaction categories: listing by type,
//! creating user categories and resolving a category from user input.

use std::sync::Arc;

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CategoryId, TransactionCategory, TransactionType};
use crate::storage::{CategoryStore, Storage};

/// Service for category management
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.categories.clone())
    }

    /// All categories, expense first
    pub async fn list(&self) -> LedgerResult<Vec<TransactionCategory>> {
        self.categories.categories().await
    }

    /// Categories of one type
    pub async fn list_by_type(
        &self,
        category_type: TransactionType,
    ) -> LedgerResult<Vec<TransactionCategory>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|c| c.category_type == category_type)
            .collect())
    }

    pub async fn get(&self, id: CategoryId) -> LedgerResult<Option<TransactionCategory>> {
        Ok(self.list().await?.into_iter().find(|c| c.id == id))
    }

    /// Find a category by name (case-insensitive) or id
    pub async fn find(&self, identifier: &str) -> LedgerResult<Option<TransactionCategory>> {
        let identifier = identifier.trim();
        let categories = self.list().await?;

        if let Some(category) = categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(category.clone()));
        }

        Ok(categories.into_iter().find(|c| c.id.matches_ref(identifier)))
    }

    /// Create a user category
    pub async fn create(
        &self,
        name: &str,
        category_type: TransactionType,
    ) -> LedgerResult<TransactionCategory> {
        let name = name.trim();
        let existing = self.list_by_type(category_type).await?;

        if existing.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = TransactionCategory::new(name, category_type);
        category.sort_order = existing.iter().map(|c| c.sort_order).max().unwrap_or(-1) + 1;
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.categories.upsert(category.clone()).await?;
        info!(name = %category.name, kind = %category_type, "category created");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CategoryRepository;
    use tempfile::TempDir;

    fn service() -> (TempDir, CategoryService) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        (temp_dir, CategoryService::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_temp_dir, service) = service();
        let created = service.create("  Freelance ", TransactionType::Income).await.unwrap();
        assert_eq!(created.name, "Freelance");
        assert_eq!(created.sort_order, 0);

        let found = service.find("freelance").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let by_id = service
            .find(&created.id.as_uuid().to_string()[..8])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_same_type() {
        let (_temp_dir, service) = service();
        service.create("Gifts", TransactionType::Income).await.unwrap();

        let err = service.create("gifts", TransactionType::Income).await.unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));

        // same name is fine for the other direction
        service.create("Gifts", TransactionType::Expense).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (_temp_dir, service) = service();
        let err = service.create("   ", TransactionType::Expense).await.unwrap_err();
        assert!(err.is_validation());
    }
}
