//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Protocol ("http" or "https")
    pub protocol: String,
    /// Frontend origin the callback redirects to and CORS allows
    /// (e.g., "http://localhost:5173")
    pub frontend_url: String,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Session store backend selector
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// In-process store; suitable for tests and single-instance deployments
    #[default]
    Memory,
    /// Redis-backed store shared across instances
    Redis,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Which backend holds session state
    #[serde(default)]
    pub backend: SessionBackend,
    /// Redis connection URL (required when backend = "redis")
    pub redis_url: Option<String>,
    /// Rolling session lifetime in seconds (refreshed on each
    /// authenticated access)
    pub ttl_seconds: u64,
    /// How often the in-memory store sweeps expired sessions, in seconds
    pub purge_interval_seconds: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub google: GoogleOAuthConfig,
}

/// Google OAuth application credentials
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Registered callback URL (e.g., "http://localhost:3000/auth/google/callback")
    pub redirect_uri: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info")
    pub level: String,
    /// Output format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (BLOGTREE_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.protocol", "http")?
            .set_default("server.frontend_url", "http://localhost:5173")?
            .set_default("database.path", "data/blogtree.db")?
            .set_default("session.backend", "memory")?
            .set_default("session.ttl_seconds", 604_800)?
            .set_default("session.purge_interval_seconds", 300)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (BLOGTREE_*)
            .add_source(
                Environment::with_prefix("BLOGTREE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Whether the session cookie should carry the Secure flag
    pub fn should_use_secure_cookies(&self) -> bool {
        self.server.protocol.eq_ignore_ascii_case("https")
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.session.ttl_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "session.ttl_seconds must be greater than zero".to_string(),
            ));
        }

        if self.session.backend == SessionBackend::Redis && self.session.redis_url.is_none() {
            return Err(crate::error::AppError::Config(
                "session.redis_url is required when session.backend=redis".to_string(),
            ));
        }

        url::Url::parse(&self.server.frontend_url).map_err(|e| {
            crate::error::AppError::Config(format!("server.frontend_url is not a valid URL: {e}"))
        })?;
        url::Url::parse(&self.auth.google.redirect_uri).map_err(|e| {
            crate::error::AppError::Config(format!(
                "auth.google.redirect_uri is not a valid URL: {e}"
            ))
        })?;

        Ok(())
    }
}
