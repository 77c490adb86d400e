//! Blogtree - a small blog backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Post endpoints (public reads, owner-guarded writes)      │
//! │  - Google OAuth / session endpoints                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Payload validation                                       │
//! │  - Authorization policy + conditional writes                │
//! │  - Cursor pagination                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! │  - Session store (in-memory / Redis)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for posts
//! - `auth`: Google OAuth flow, session guard, authorization policy
//! - `service`: Business logic layer
//! - `data`: Database layer
//! - `session`: Pluggable session store
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod service;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use crate::session::SessionStore;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool, the session store,
/// and the HTTP client for the identity provider.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Session store (cookie token → user id, rolling TTL)
    pub sessions: Arc<dyn SessionStore>,

    /// HTTP client for the Google OAuth calls
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database (runs migrations)
    /// 2. Build the configured session store
    /// 3. Build the outbound HTTP client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        // 2. Build the session store
        let ttl = Duration::from_secs(config.session.ttl_seconds);
        let sessions: Arc<dyn SessionStore> = match config.session.backend {
            config::SessionBackend::Memory => {
                Arc::new(session::MemorySessionStore::new(ttl))
            }
            config::SessionBackend::Redis => {
                let url = config.session.redis_url.as_deref().ok_or_else(|| {
                    error::AppError::Config(
                        "session.redis_url is required when session.backend=redis".to_string(),
                    )
                })?;
                Arc::new(session::RedisSessionStore::connect(url, ttl).await?)
            }
        };
        tracing::info!("Session store initialized");

        // 3. Build the HTTP client
        let http_client = reqwest::Client::builder()
            .user_agent("Blogtree/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            sessions,
            http_client: Arc::new(http_client),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::trace::TraceLayer;

    let cors_layer = build_cors_layer(&state.config);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/auth", auth::auth_router())
        .nest("/posts", api::posts_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Allow the configured frontend origin with credentials
///
/// Credentialed CORS forbids wildcards, so methods and headers are
/// enumerated explicitly.
fn build_cors_layer(config: &config::AppConfig) -> tower_http::cors::CorsLayer {
    use axum::http::{header, HeaderValue, Method};
    use tower_http::cors::CorsLayer;

    let allowed_methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
    ];

    match HeaderValue::from_str(config.server.frontend_url.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(allowed_methods)
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %config.server.frontend_url,
                "Failed to parse CORS origin from frontend URL; denying cross-origin requests"
            );
            CorsLayer::new()
                .allow_methods(allowed_methods)
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
