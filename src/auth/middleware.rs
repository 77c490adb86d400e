//! Authentication guard
//!
//! Resolves the session cookie against the session store and hands
//! handlers an explicit session object. Requests without a valid
//! session are rejected with 401 before any handler logic runs.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::session::SESSION_COOKIE;
use crate::AppState;

/// An authenticated session resolved from the request cookie
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Opaque session store key (needed again at logout)
    pub session_id: String,
    /// The authenticated user's ID
    pub user_id: String,
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Extractor for the current authenticated session
///
/// Looks up the cookie token in the session store and refreshes its
/// TTL (rolling expiry). Missing, unknown, or expired tokens fail the
/// request with 401.
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(session): CurrentUser) -> impl IntoResponse {
///     format!("user {}", session.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AuthSession>().cloned() {
            return Ok(CurrentUser(session));
        }

        let state = AppState::from_ref(state);
        let session_id = session_cookie(&parts.headers).ok_or(AppError::Unauthorized)?;

        let record = state
            .sessions
            .get(&session_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Rolling expiry: activity restarts the session lifetime
        state.sessions.touch(&session_id).await?;

        let session = AuthSession {
            session_id,
            user_id: record.user_id,
        };
        parts.extensions.insert(session.clone());

        Ok(CurrentUser(session))
    }
}
