//! Service layer
//!
//! Business logic between the HTTP handlers and the data layer.

mod post;

pub use post::{validate_payload, PostPayload, PostService, DEFAULT_PAGE_SIZE};
