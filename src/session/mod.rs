//! Session store
//!
//! Server-side session state keyed by an opaque cookie token.
//! The store is a pluggable key-value interface with a rolling TTL:
//! in-memory for tests and single-instance deployments, Redis for
//! shared production deployments.

mod memory;
mod redis;

pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the HTTP-only session cookie
pub const SESSION_COOKIE: &str = "blogtree-auth";

/// Server-side session state for one cookie token
///
/// Deliberately minimal: the session carries only the authenticated
/// user's ID. Everything else is looked up per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
}

/// Key-value session store with rolling expiry
///
/// Each backend owns its TTL; `touch` restarts it so an active session
/// never expires mid-use.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session for `user_id` and return its opaque key
    async fn create(&self, user_id: &str) -> Result<String, AppError>;

    /// Look up a session; expired or unknown keys yield `None`
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError>;

    /// Restart the session's TTL (rolling expiry)
    async fn touch(&self, session_id: &str) -> Result<(), AppError>;

    /// Destroy a session (logout)
    async fn destroy(&self, session_id: &str) -> Result<(), AppError>;

    /// Drop expired entries, returning how many were removed
    ///
    /// Backends with native TTL support keep this a no-op.
    async fn purge_expired(&self) -> Result<u64, AppError> {
        Ok(0)
    }
}

/// Generate an opaque session key (256 random bits, URL-safe base64)
pub(crate) fn generate_session_id() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique_and_url_safe() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43); // 32 bytes, unpadded base64
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
