//! API layer
//!
//! HTTP handlers and DTOs for the post endpoints.
//! Auth endpoints live in `crate::auth`.

mod posts;

pub use posts::posts_router;
