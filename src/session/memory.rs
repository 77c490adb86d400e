//! In-memory session store
//!
//! Sessions live in a `HashMap` behind a `tokio::sync::RwLock` with an
//! expiry stamp per entry. Expired entries are invisible to `get`
//! immediately; a periodic `purge_expired` sweep reclaims the memory.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{generate_session_id, SessionRecord, SessionStore};
use crate::error::AppError;

struct MemoryEntry {
    record: SessionRecord,
    expires_at: Instant,
}

/// In-process session store with rolling TTL
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemorySessionStore {
    /// Create a store whose sessions expire `ttl` after last activity
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: &str) -> Result<String, AppError> {
        let session_id = generate_session_id();
        let entry = MemoryEntry {
            record: SessionRecord {
                user_id: user_id.to_string(),
            },
            expires_at: Instant::now() + self.ttl,
        };

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), entry);

        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.record.clone());

        Ok(record)
    }

    async fn touch(&self, session_id: &str) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(session_id) {
            if entry.expires_at > Instant::now() {
                entry.expires_at = Instant::now() + self.ttl;
            }
        }

        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Instant::now();
        sessions.retain(|_, entry| entry.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}
