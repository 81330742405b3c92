use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo::{SessionRepo, UserRepo},
        repo_types::{NewUser, Session, User},
    },
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Tokens are UUIDs on the wire; anything else cannot name a session.
fn parse_token(token: &str) -> Option<Uuid> {
    Uuid::parse_str(token.trim()).ok()
}

#[derive(Debug)]
pub struct LoggedIn {
    pub user: User,
    pub session: Session,
}

/// Registration, login and session resolution over the user and session stores.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, sessions: Arc<dyn SessionRepo>) -> Self {
        Self { users, sessions }
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AppError::EmailAlreadyRegistered);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
            })
            .await?
            // lost a race with a concurrent registration
            .ok_or(AppError::EmailAlreadyRegistered)?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoggedIn, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(%email, "login unknown email");
                AppError::UserNotFound
            })?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidPassword);
        }

        let session = self.sessions.generate_token(&user).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoggedIn { user, session })
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let Some(id) = parse_token(token) else {
            debug!("logout with malformed token");
            return Ok(());
        };
        match self.sessions.delete_token(id).await? {
            Some(session) => info!(user_id = %session.user_id, "user logged out"),
            None => debug!(session_id = %id, "logout for unknown session"),
        }
        Ok(())
    }

    pub async fn get_session(&self, token: &str) -> Result<(Session, User), AppError> {
        let id = parse_token(token).ok_or(AppError::SessionNotFound)?;
        self.sessions
            .get_token(id)
            .await?
            .ok_or(AppError::SessionNotFound)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }
}
