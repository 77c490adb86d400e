//! Post service
//!
//! Business logic for posts: payload validation, cursor pagination,
//! and ownership-guarded mutations.

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::policy::{authorize, Operation};
use crate::data::{Database, Post, PostWithAuthor};
use crate::error::{AppError, FieldErrors};

const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 100;
const CONTENT_MIN_CHARS: usize = 50;

/// Default page size for the listing endpoint
pub const DEFAULT_PAGE_SIZE: i64 = 2;
const MAX_PAGE_SIZE: i64 = 100;

/// A candidate post payload for create and update
///
/// Exactly these two fields survive deserialization; anything else in
/// the request body (a forged owner ID, say) is silently dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

/// Validate a payload against the field constraints
///
/// # Returns
/// The payload itself on success, or a per-field error map:
/// title length must be within [10, 100] characters and content at
/// least 50 characters, bounds inclusive.
pub fn validate_payload(payload: PostPayload) -> Result<PostPayload, AppError> {
    let mut errors = FieldErrors::new();

    let title_len = payload.title.chars().count();
    if title_len < TITLE_MIN_CHARS {
        errors.entry("title".to_string()).or_default().push(format!(
            "title must be at least {TITLE_MIN_CHARS} characters"
        ));
    } else if title_len > TITLE_MAX_CHARS {
        errors.entry("title".to_string()).or_default().push(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        ));
    }

    if payload.content.chars().count() < CONTENT_MIN_CHARS {
        errors.entry("content".to_string()).or_default().push(format!(
            "content must be at least {CONTENT_MIN_CHARS} characters"
        ));
    }

    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Post service
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    /// Create new post service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =========================================================================
    // Reads (public, no authorization)
    // =========================================================================

    /// List posts, newest ID first, enriched with author fields
    ///
    /// # Arguments
    /// * `page_size` - Requested page size (absent → 2, clamped to [1, 100])
    /// * `cursor` - Exclusive upper bound on post ID for the next page
    pub async fn list(
        &self,
        page_size: Option<i64>,
        cursor: Option<i64>,
    ) -> Result<Vec<PostWithAuthor>, AppError> {
        let limit = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        self.db.list_posts(limit, cursor).await
    }

    /// Get a single post by ID
    pub async fn get(&self, id: i64) -> Result<Post, AppError> {
        self.db.get_post(id).await?.ok_or(AppError::NotFound)
    }

    // =========================================================================
    // Mutations (authorization-guarded)
    // =========================================================================

    /// Create a post owned by `user_id`
    ///
    /// Any authenticated user may create; ownership is assigned from
    /// the session, never taken from the payload.
    pub async fn create(&self, user_id: &str, payload: PostPayload) -> Result<Post, AppError> {
        authorize(Operation::Create, Some(user_id), None).require()?;
        let payload = validate_payload(payload)?;

        self.db
            .insert_post(&payload.title, &payload.content, user_id)
            .await
    }

    /// Update a post, requiring ownership
    ///
    /// The lookup distinguishes 404 from 403; the write itself is a
    /// single conditional UPDATE, so a concurrent owner change cannot
    /// slip between check and mutation. Zero affected rows after a
    /// successful check means the post vanished concurrently: 404.
    pub async fn update(
        &self,
        user_id: &str,
        id: i64,
        payload: PostPayload,
    ) -> Result<(), AppError> {
        let owner = self.db.get_post_owner(id).await?.ok_or(AppError::NotFound)?;
        authorize(Operation::Update, Some(user_id), Some(&owner)).require()?;
        let payload = validate_payload(payload)?;

        let updated = self
            .db
            .update_post_owned(id, user_id, &payload.title, &payload.content)
            .await?;
        if !updated {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Delete a post, requiring ownership
    ///
    /// Delete is guarded exactly like update.
    pub async fn delete(&self, user_id: &str, id: i64) -> Result<(), AppError> {
        let owner = self.db.get_post_owner(id).await?.ok_or(AppError::NotFound)?;
        authorize(Operation::Delete, Some(user_id), Some(&owner)).require()?;

        let deleted = self.db.delete_post_owned(id, user_id).await?;
        if !deleted {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
