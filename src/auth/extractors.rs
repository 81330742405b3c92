use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{auth::repo_types::User, error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "session";

/// Resolves the `session` cookie to the user who owns it.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        match state.auth.get_session(&token).await {
            Ok((_, user)) => Ok(SessionUser(user)),
            Err(AppError::SessionNotFound) => {
                warn!("request with unknown session");
                Err(AppError::SessionNotFound)
            }
            Err(e) => Err(e),
        }
    }
}
