use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{
    repo::CategoryRepo,
    repo_types::{Category, CategorySummary},
};
use crate::{authz::ensure_owned, error::AppError};

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepo>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepo>) -> Self {
        Self { categories }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CategorySummary>, AppError> {
        Ok(self.categories.list_by_user(user_id).await?)
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> Result<Category, AppError> {
        let category = self.categories.create(name, user_id).await?;
        info!(%user_id, category_id = %category.id, "category created");
        Ok(category)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<Category, AppError> {
        let current = self.categories.get_by_id(id).await?;
        ensure_owned(current, user_id, "Category")?;

        let updated = self
            .categories
            .update(id, name)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
        info!(%user_id, category_id = %id, "category updated");
        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Category, AppError> {
        let current = self.categories.get_by_id(id).await?;
        ensure_owned(current, user_id, "Category")?;

        let deleted = self
            .categories
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;
        info!(%user_id, category_id = %id, "category deleted");
        Ok(deleted)
    }
}
