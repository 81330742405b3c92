use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::repo_types::{Category, CategorySummary};
use crate::error::AppError;

/// Body of both `POST /categories` and `PATCH /categories/:id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    /// 3 to 20 characters after trimming.
    #[schema(example = "Programming")]
    pub name: String,
}

impl CategoryRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = self.name.trim().to_string();
        let len = self.name.chars().count();
        if !(3..=20).contains(&len) {
            return Err(AppError::validation("Name must be between 3 and 20 characters"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    CategoryListResponse = CategoryResponse<Vec<CategorySummary>>,
    CategoryItemResponse = CategoryResponse<Category>
)]
pub struct CategoryResponse<T> {
    #[schema(value_type = String)]
    pub message: &'static str,
    pub data: T,
}
