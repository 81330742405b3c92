use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Category, CategorySummary};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<CategorySummary>>;
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create(&self, name: &str, user_id: Uuid) -> anyhow::Result<Category>;
    async fn update(&self, id: Uuid, name: &str) -> anyhow::Result<Option<Category>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
}

#[derive(Clone)]
pub struct PgCategoryRepo {
    db: PgPool,
}

impl PgCategoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<CategorySummary>> {
        let rows = sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT id, name
              FROM categories
             WHERE user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list categories by user")?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id, created_at, updated_at
              FROM categories
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get category")?;
        Ok(row)
    }

    async fn create(&self, name: &str, user_id: Uuid) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("insert category")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, name: &str) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("update category")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            DELETE FROM categories
             WHERE id = $1
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete category")?;
        Ok(row)
    }
}
