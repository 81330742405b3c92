use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    categorize::{build_prompt, is_valid_url, parse_categorization},
    completion::CompletionClient,
    repo::LinkRepo,
    repo_types::{Link, LinkChanges, LinkFilter, LinkItem, NewLink},
};
use crate::{authz::ensure_owned, categories::repo::CategoryRepo, error::AppError};

const LATEST_LINKS: i64 = 5;

#[derive(Clone)]
pub struct LinkService {
    links: Arc<dyn LinkRepo>,
    categories: Arc<dyn CategoryRepo>,
    completion: Arc<dyn CompletionClient>,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepo>,
        categories: Arc<dyn CategoryRepo>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            links,
            categories,
            completion,
        }
    }

    pub async fn list(&self, user_id: Uuid, filter: LinkFilter) -> Result<Vec<LinkItem>, AppError> {
        Ok(self.links.list_by_user(user_id, &filter).await?)
    }

    pub async fn latest(&self, user_id: Uuid) -> Result<Vec<LinkItem>, AppError> {
        Ok(self.links.latest_by_user(user_id, LATEST_LINKS).await?)
    }

    /// Create a link whose title, summary and category come from the completion
    /// service. The caller only supplies the URL.
    pub async fn create(&self, user_id: Uuid, url: &str) -> Result<Link, AppError> {
        let categories = self.categories.list_by_user(user_id).await?;
        if categories.is_empty() {
            return Err(AppError::not_found("Category not found. Create one first!"));
        }

        if !is_valid_url(url) {
            warn!(%user_id, %url, "rejected link url");
            return Err(AppError::bad_request("URL format is not valid!"));
        }

        let prompt = build_prompt(&categories, url)?;
        let categorized = match self.completion.complete(prompt).await {
            Ok(raw) => parse_categorization(&raw, &categories),
            Err(e) => Err(e),
        };
        let categorized = categorized.map_err(|e| {
            error!(error = ?e, %user_id, %url, "link categorization failed");
            AppError::Internal(e.context("categorize link"))
        })?;

        let link = self
            .links
            .create(NewLink {
                link: url.to_string(),
                title: categorized.title,
                summary: categorized.summary,
                category_id: categorized.category_id,
                user_id,
            })
            .await?;
        info!(%user_id, link_id = %link.id, category_id = %link.category_id, "link created");
        Ok(link)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, changes: LinkChanges) -> Result<Link, AppError> {
        let current = self.links.get_by_id(id).await?;
        ensure_owned(current, user_id, "Link")?;

        if !is_valid_url(&changes.link) {
            return Err(AppError::bad_request("URL format is not valid!"));
        }

        let category = self.categories.get_by_id(changes.category_id).await?;
        ensure_owned(category, user_id, "Category")?;

        let updated = self
            .links
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))?;
        info!(%user_id, link_id = %id, "link updated");
        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Link, AppError> {
        let current = self.links.get_by_id(id).await?;
        ensure_owned(current, user_id, "Link")?;

        let deleted = self
            .links
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))?;
        info!(%user_id, link_id = %id, "link deleted");
        Ok(deleted)
    }
}
