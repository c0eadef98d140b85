use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::session::{SessionKeys, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Validates the session cookie, yielding the admin's user ID.
///
/// Every admin-mutating handler takes this extractor first; a missing or
/// invalid session redirects to the login page before any mutation runs.
#[derive(Debug)]
pub struct AdminSession(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AppError::Unauthenticated)?;

        let keys = SessionKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session");
            AppError::Unauthenticated
        })?;

        Ok(AdminSession(claims.sub))
    }
}
