use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{authz::Owned, categories::repo_types::CategorySummary};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: Uuid,
    pub link: String,
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Owned for Link {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Link as shown in listings, with its category inlined.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub category: CategorySummary,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub(crate) struct LinkItemRow {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: OffsetDateTime,
}

impl From<LinkItemRow> for LinkItem {
    fn from(r: LinkItemRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            link: r.link,
            summary: r.summary,
            category: CategorySummary {
                id: r.category_id,
                name: r.category_name,
            },
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLink {
    pub link: String,
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
    pub user_id: Uuid,
}

/// Replacement values for `PATCH /links/:id`.
#[derive(Debug, Clone)]
pub struct LinkChanges {
    pub link: String,
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
}
