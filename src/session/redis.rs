//! Redis-backed session store
//!
//! Sessions are JSON values under `session:<key>` with a native Redis
//! TTL. Uses a connection manager for automatic reconnection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{generate_session_id, SessionRecord, SessionStore};
use crate::error::AppError;

const KEY_PREFIX: &str = "session:";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis session store shared across server instances
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl: Duration,
}

impl RedisSessionStore {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `url` - Redis URL (e.g., "redis://localhost:6379")
    /// * `ttl` - Rolling session lifetime
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, AppError> {
        let client = Client::open(url).map_err(|e| AppError::SessionStore(e.to_string()))?;

        // Bounded wait so a misconfigured Redis fails startup fast
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| AppError::SessionStore("Redis connection timed out".to_string()))?
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        tracing::info!(url = %url, "Connected to Redis session store");

        Ok(Self { conn, ttl })
    }

    fn key(session_id: &str) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: &str) -> Result<String, AppError> {
        let session_id = generate_session_id();
        let record = SessionRecord {
            user_id: user_id.to_string(),
        };
        let payload = serde_json::to_string(&record)
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(&session_id), payload, self.ttl.as_secs())
            .await
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(Self::key(session_id))
            .await
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        let record = payload
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        Ok(record)
    }

    async fn touch(&self, session_id: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        // EXPIRE on a missing key is a no-op, matching the memory store
        conn.expire::<_, ()>(Self::key(session_id), self.ttl.as_secs() as i64)
            .await
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(session_id))
            .await
            .map_err(|e| AppError::SessionStore(e.to_string()))?;

        Ok(())
    }
}
