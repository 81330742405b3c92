use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Session, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Insert a user. `None` means the email is already taken.
    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Create a session for `user`; the store picks the token.
    async fn generate_token(&self, user: &User) -> anyhow::Result<Session>;
    async fn get_token(&self, id: Uuid) -> anyhow::Result<Option<(Session, User)>>;
    /// Remove a session. Removing an unknown id is not an error.
    async fn delete_token(&self, id: Uuid) -> anyhow::Result<Option<Session>>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgSessionRepo {
    db: PgPool,
}

impl PgSessionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Session joined with its owner, as returned by `get_token`.
#[derive(FromRow)]
struct SessionUserRow {
    session_id: Uuid,
    session_created_at: OffsetDateTime,
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[async_trait]
impl SessionRepo for PgSessionRepo {
    async fn generate_token(&self, user: &User) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(user.id)
        .fetch_one(&self.db)
        .await
        .context("insert session")?;
        Ok(session)
    }

    async fn get_token(&self, id: Uuid) -> anyhow::Result<Option<(Session, User)>> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT s.id AS session_id, s.created_at AS session_created_at,
                   u.id, u.email, u.name, u.password_hash, u.created_at, u.updated_at
              FROM sessions s
              JOIN users u ON u.id = s.user_id
             WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get session")?;

        Ok(row.map(|r| {
            let session = Session {
                id: r.session_id,
                user_id: r.id,
                created_at: r.session_created_at,
            };
            let user = User {
                id: r.id,
                email: r.email,
                name: r.name,
                password_hash: r.password_hash,
                created_at: r.created_at,
                updated_at: r.updated_at,
            };
            (session, user)
        }))
    }

    async fn delete_token(&self, id: Uuid) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete session")?;
        Ok(session)
    }
}
