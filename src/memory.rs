//! In-memory stand-ins for the Postgres stores and the completion API.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::{SessionRepo, UserRepo},
        repo_types::{NewUser, Session, User},
    },
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategorySummary},
    },
    links::{
        completion::{CompletionClient, CompletionRequest},
        repo::LinkRepo,
        repo_types::{Link, LinkChanges, LinkFilter, LinkItem, NewLink},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    categories: Vec<Category>,
    links: Vec<Link>,
}

impl Tables {
    fn item(&self, link: &Link) -> Option<LinkItem> {
        let category = self.categories.iter().find(|c| c.id == link.category_id)?;
        Some(LinkItem {
            id: link.id,
            title: link.title.clone(),
            link: link.link.clone(),
            summary: link.summary.clone(),
            category: CategorySummary {
                id: category.id,
                name: category.name.clone(),
            },
            created_at: link.created_at,
        })
    }
}

/// One lock over all tables; cascades mirror the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables().sessions.len()
    }

    pub fn link_count(&self) -> usize {
        self.tables().links.len()
    }

    pub fn category(&self, id: Uuid) -> Option<Category> {
        self.tables().categories.iter().find(|c| c.id == id).cloned()
    }

    pub fn link(&self, id: Uuid) -> Option<Link> {
        self.tables().links.iter().find(|l| l.id == id).cloned()
    }

    pub fn insert_category(&self, user_id: Uuid, name: &str) -> Category {
        let now = OffsetDateTime::now_utc();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables().categories.push(category.clone());
        category
    }

    pub fn insert_link(&self, user_id: Uuid, category_id: Uuid, url: &str, title: &str) -> Link {
        let now = OffsetDateTime::now_utc();
        let link = Link {
            id: Uuid::new_v4(),
            link: url.to_string(),
            title: title.to_string(),
            summary: format!("About {title}"),
            category_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables().links.push(link.clone());
        link
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl SessionRepo for MemoryStore {
    async fn generate_token(&self, user: &User) -> anyhow::Result<Session> {
        let mut t = self.tables();
        anyhow::ensure!(t.users.iter().any(|u| u.id == user.id), "unknown user {}", user.id);
        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_token(&self, id: Uuid) -> anyhow::Result<Option<(Session, User)>> {
        let t = self.tables();
        let found = t.sessions.iter().find(|s| s.id == id).and_then(|s| {
            let user = t.users.iter().find(|u| u.id == s.user_id)?;
            Some((s.clone(), user.clone()))
        });
        Ok(found)
    }

    async fn delete_token(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let mut t = self.tables();
        let pos = t.sessions.iter().position(|s| s.id == id);
        Ok(pos.map(|i| t.sessions.remove(i)))
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<CategorySummary>> {
        Ok(self
            .tables()
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| CategorySummary {
                id: c.id,
                name: c.name.clone(),
            })
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.category(id))
    }

    async fn create(&self, name: &str, user_id: Uuid) -> anyhow::Result<Category> {
        Ok(self.insert_category(user_id, name))
    }

    async fn update(&self, id: Uuid, name: &str) -> anyhow::Result<Option<Category>> {
        let mut t = self.tables();
        Ok(t.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.updated_at = OffsetDateTime::now_utc();
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let mut t = self.tables();
        let Some(pos) = t.categories.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        t.links.retain(|l| l.category_id != id);
        Ok(Some(t.categories.remove(pos)))
    }
}

#[async_trait]
impl LinkRepo for MemoryStore {
    async fn list_by_user(&self, user_id: Uuid, filter: &LinkFilter) -> anyhow::Result<Vec<LinkItem>> {
        let t = self.tables();
        let needle = filter.title.as_ref().map(|s| s.to_lowercase());
        Ok(t.links
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .filter(|l| needle.as_ref().map_or(true, |n| l.title.to_lowercase().contains(n)))
            .filter(|l| filter.category_id.map_or(true, |c| l.category_id == c))
            .filter_map(|l| t.item(l))
            .collect())
    }

    async fn latest_by_user(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<LinkItem>> {
        let t = self.tables();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(t.links
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| t.item(l))
            .take(limit)
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Link>> {
        Ok(self.link(id))
    }

    async fn create(&self, new: NewLink) -> anyhow::Result<Link> {
        let now = OffsetDateTime::now_utc();
        let link = Link {
            id: Uuid::new_v4(),
            link: new.link,
            title: new.title,
            summary: new.summary,
            category_id: new.category_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables().links.push(link.clone());
        Ok(link)
    }

    async fn update(&self, id: Uuid, changes: LinkChanges) -> anyhow::Result<Option<Link>> {
        let mut t = self.tables();
        Ok(t.links.iter_mut().find(|l| l.id == id).map(|l| {
            l.link = changes.link;
            l.title = changes.title;
            l.summary = changes.summary;
            l.category_id = changes.category_id;
            l.updated_at = OffsetDateTime::now_utc();
            l.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Link>> {
        let mut t = self.tables();
        let pos = t.links.iter().position(|l| l.id == id);
        Ok(pos.map(|i| t.links.remove(i)))
    }
}

/// Completion client with a canned reply that records what it was asked.
pub struct StubCompletion {
    reply: Mutex<Option<String>>,
    calls: AtomicUsize,
    last: Mutex<Option<CompletionRequest>>,
}

impl StubCompletion {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(Some(reply.into())),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn set_reply(&self, reply: impl Into<String>) {
        *self.reply.lock().unwrap() = Some(reply.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("completion service unavailable"))
    }
}
