use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Link, LinkChanges, LinkFilter, LinkItem, LinkItemRow, NewLink};

#[async_trait]
pub trait LinkRepo: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid, filter: &LinkFilter) -> anyhow::Result<Vec<LinkItem>>;
    /// Newest first.
    async fn latest_by_user(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<LinkItem>>;
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Link>>;
    async fn create(&self, new: NewLink) -> anyhow::Result<Link>;
    async fn update(&self, id: Uuid, changes: LinkChanges) -> anyhow::Result<Option<Link>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Link>>;
}

/// Escape LIKE metacharacters so user input only matches literally.
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[derive(Clone)]
pub struct PgLinkRepo {
    db: PgPool,
}

impl PgLinkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkRepo for PgLinkRepo {
    async fn list_by_user(&self, user_id: Uuid, filter: &LinkFilter) -> anyhow::Result<Vec<LinkItem>> {
        let rows = sqlx::query_as::<_, LinkItemRow>(
            r#"
            SELECT l.id, l.title, l.link, l.summary, l.created_at,
                   c.id AS category_id, c.name AS category_name
              FROM links l
              JOIN categories c ON c.id = l.category_id
             WHERE l.user_id = $1
               AND ($2::text IS NULL OR l.title ILIKE $2 ESCAPE '\')
               AND ($3::uuid IS NULL OR l.category_id = $3)
             ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.title.as_deref().map(like_pattern))
        .bind(filter.category_id)
        .fetch_all(&self.db)
        .await
        .context("list links by user")?;
        Ok(rows.into_iter().map(LinkItem::from).collect())
    }

    async fn latest_by_user(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<LinkItem>> {
        let rows = sqlx::query_as::<_, LinkItemRow>(
            r#"
            SELECT l.id, l.title, l.link, l.summary, l.created_at,
                   c.id AS category_id, c.name AS category_name
              FROM links l
              JOIN categories c ON c.id = l.category_id
             WHERE l.user_id = $1
             ORDER BY l.created_at DESC
             LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("latest links by user")?;
        Ok(rows.into_iter().map(LinkItem::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Link>> {
        let row = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, link, title, summary, category_id, user_id, created_at, updated_at
              FROM links
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get link")?;
        Ok(row)
    }

    async fn create(&self, new: NewLink) -> anyhow::Result<Link> {
        let row = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (link, title, summary, category_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, link, title, summary, category_id, user_id, created_at, updated_at
            "#,
        )
        .bind(&new.link)
        .bind(&new.title)
        .bind(&new.summary)
        .bind(new.category_id)
        .bind(new.user_id)
        .fetch_one(&self.db)
        .await
        .context("insert link")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: LinkChanges) -> anyhow::Result<Option<Link>> {
        let row = sqlx::query_as::<_, Link>(
            r#"
            UPDATE links
               SET link = $2, title = $3, summary = $4, category_id = $5, updated_at = now()
             WHERE id = $1
            RETURNING id, link, title, summary, category_id, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.link)
        .bind(&changes.title)
        .bind(&changes.summary)
        .bind(changes.category_id)
        .fetch_optional(&self.db)
        .await
        .context("update link")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Link>> {
        let row = sqlx::query_as::<_, Link>(
            r#"
            DELETE FROM links
             WHERE id = $1
            RETURNING id, link, title, summary, category_id, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete link")?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
