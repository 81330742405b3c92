use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::repo_types::{Link, LinkChanges, LinkFilter, LinkItem};
use crate::error::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLinkRequest {
    #[schema(example = "https://www.rust-lang.org")]
    pub link: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub link: String,
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
}

impl UpdateLinkRequest {
    pub fn into_changes(self) -> Result<LinkChanges, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        Ok(LinkChanges {
            link: self.link.trim().to_string(),
            title,
            summary: self.summary.trim().to_string(),
            category_id: self.category_id,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LinkQuery {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Only links filed under this category.
    pub category: Option<Uuid>,
}

impl From<LinkQuery> for LinkFilter {
    fn from(q: LinkQuery) -> Self {
        Self {
            title: q.title.filter(|t| !t.trim().is_empty()),
            category_id: q.category,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[aliases(LinkListResponse = LinkResponse<Vec<LinkItem>>, SingleLinkResponse = LinkResponse<Link>)]
pub struct LinkResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> LinkResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_query_is_no_filter() {
        let filter = LinkFilter::from(LinkQuery {
            title: Some("  ".into()),
            category: None,
        });
        assert!(filter.title.is_none());
    }

    #[test]
    fn update_body_uses_camel_case() {
        let id = Uuid::new_v4();
        let body = format!(
            r#"{{"link":" https://example.com ","title":"T","summary":"S","categoryId":"{id}"}}"#
        );
        let req: UpdateLinkRequest = serde_json::from_str(&body).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.category_id, id);
        assert_eq!(changes.link, "https://example.com");
    }
}
