use crate::auth::{
    repo::{PgSessionRepo, PgUserRepo},
    services::AuthService,
};
use crate::categories::{repo::PgCategoryRepo, services::CategoryService};
use crate::config::AppConfig;
use crate::links::{completion::OpenAiClient, repo::PgLinkRepo, services::LinkService};
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a handler can reach. Built once in `main`, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub categories: CategoryService,
    pub links: LinkService,
}

impl AppState {
    /// Wire the Postgres stores and the completion client into the services.
    pub fn init(config: Arc<AppConfig>, db: PgPool) -> anyhow::Result<Self> {
        let users = Arc::new(PgUserRepo::new(db.clone()));
        let sessions = Arc::new(PgSessionRepo::new(db.clone()));
        let categories = Arc::new(PgCategoryRepo::new(db.clone()));
        let links = Arc::new(PgLinkRepo::new(db));
        let completion = Arc::new(OpenAiClient::new(&config.completion)?);

        Ok(Self {
            auth: AuthService::new(users, sessions),
            categories: CategoryService::new(categories.clone()),
            links: LinkService::new(links, categories, completion),
            config,
        })
    }

    /// State backed by one in-memory store and the given completion stub.
    #[cfg(test)]
    pub fn fake(completion: Arc<crate::memory::StubCompletion>) -> Self {
        use crate::memory::MemoryStore;

        let store = Arc::new(MemoryStore::default());
        Self {
            config: Arc::new(AppConfig::for_tests()),
            auth: AuthService::new(store.clone(), store.clone()),
            categories: CategoryService::new(store.clone()),
            links: LinkService::new(store.clone(), store, completion),
        }
    }
}
