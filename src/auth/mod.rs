//! Authentication and authorization
//!
//! Handles:
//! - Google OAuth login flow
//! - Session-backed auth guard (extractor)
//! - Ownership authorization policy

mod middleware;
mod oauth;
pub mod policy;

pub use middleware::{AuthSession, CurrentUser};
pub use oauth::auth_router;
