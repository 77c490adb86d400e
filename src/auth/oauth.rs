//! Google OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with Google:
//! redirect to the provider, exchange the callback code for tokens,
//! read the profile from the id_token's tokeninfo endpoint, then
//! find-or-create the user and open a session.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use super::middleware::CurrentUser;
use crate::config::AppConfig;
use crate::data::{User, UserId};
use crate::error::AppError;
use crate::session::SESSION_COOKIE;
use crate::AppState;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";
const OAUTH_SCOPE: &str = "openid email profile";

/// Create authentication router
///
/// Routes:
/// - GET /login/google - Redirect to Google
/// - GET /google/callback - OAuth callback
/// - GET /me - Current user's display name
/// - GET /logout - Destroy session
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login/google", get(google_redirect))
        .route("/google/callback", get(google_callback))
        .route("/me", get(me))
        .route("/logout", get(logout))
}

// =============================================================================
// Google OAuth
// =============================================================================

/// GET /auth/login/google
///
/// Redirects the browser to Google's authorization page.
async fn google_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let google = &state.config.auth.google;
    let url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
        GOOGLE_AUTH_URL,
        urlencoding::encode(&google.client_id),
        urlencoding::encode(&google.redirect_uri),
        urlencoding::encode(OAUTH_SCOPE),
    );

    Redirect::to(&url)
}

/// Query parameters from the Google callback
#[derive(Debug, Deserialize)]
struct GoogleCallbackQuery {
    /// Authorization code
    code: String,
}

/// Google token endpoint response
///
/// Only the id_token is consumed; the access token grants API scopes
/// this system never uses.
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    id_token: String,
}

/// Profile claims from the tokeninfo endpoint
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    email: String,
    name: String,
    picture: String,
    /// Stable Google subject identifier
    sub: String,
}

/// GET /auth/google/callback
///
/// # Steps
/// 1. Exchange the authorization code for tokens
/// 2. Look up the id_token's profile claims
/// 3. Find the user by email, or create one on first login
/// 4. Open a session and set the cookie
/// 5. Redirect to the frontend
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let google = &state.config.auth.google;

    // 1. Exchange the code for tokens
    let tokens: GoogleTokenResponse = state
        .http_client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("redirect_uri", google.redirect_uri.as_str()),
            ("code", query.code.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .error_for_status()
        .map_err(|_| AppError::OAuth("token exchange rejected".to_string()))?
        .json()
        .await
        .map_err(|_| AppError::OAuth("malformed token response".to_string()))?;

    // 2. Resolve the id_token to profile claims
    let profile: GoogleTokenInfo = state
        .http_client
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", tokens.id_token.as_str())])
        .send()
        .await?
        .error_for_status()
        .map_err(|_| AppError::OAuth("id_token rejected".to_string()))?
        .json()
        .await
        .map_err(|_| AppError::OAuth("malformed tokeninfo response".to_string()))?;

    // 3. Find or create the user
    let user = find_or_create_user(&state, profile).await?;

    // 4. Open the session
    let session_id = state.sessions.create(&user.id).await?;
    let jar = jar.add(build_session_cookie(&state.config, session_id));

    tracing::info!(user_id = %user.id, "login completed");

    // 5. Back to the frontend
    Ok((jar, Redirect::to(&state.config.server.frontend_url)))
}

/// Find the user for a verified profile, creating it on first login
///
/// Repeat logins sync the provider-supplied display fields (name,
/// picture); identity columns are immutable after creation.
async fn find_or_create_user(state: &AppState, profile: GoogleTokenInfo) -> Result<User, AppError> {
    if let Some(existing) = state.db.get_user_by_email(&profile.email).await? {
        if existing.name != profile.name || existing.picture != profile.picture {
            state
                .db
                .update_user_profile(&existing.id, &profile.name, &profile.picture)
                .await?;
        }
        return Ok(User {
            name: profile.name,
            picture: profile.picture,
            ..existing
        });
    }

    let user = User {
        id: UserId::new().0,
        name: profile.name,
        email: profile.email,
        provider: "google".to_string(),
        provider_account_id: profile.sub,
        picture: profile.picture,
        created_at: chrono::Utc::now(),
    };
    state.db.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "user created on first login");

    Ok(user)
}

fn build_session_cookie(config: &AppConfig, session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.should_use_secure_cookies())
        .max_age(time::Duration::seconds(config.session.ttl_seconds as i64))
        .build()
}

// =============================================================================
// Session endpoints
// =============================================================================

/// GET /auth/me
///
/// Returns the authenticated user's display name.
async fn me(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    // A session can outlive its user row only if the store and the
    // database disagree; treat that as an unauthenticated request.
    let user = state
        .db
        .get_user(&session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(serde_json::json!({ "userName": user.name })))
}

/// GET /auth/logout
///
/// Destroys the session and clears the cookie.
async fn logout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.destroy(&session.session_id).await?;

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);

    Ok((jar, Json(serde_json::json!({ "msg": "success" }))))
}
