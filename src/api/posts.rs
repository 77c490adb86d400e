//! Post endpoints
//!
//! Reads are public; mutations require a session and, for update and
//! delete, ownership of the target post.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::data::{Post, PostWithAuthor};
use crate::error::AppError;
use crate::service::{PostPayload, PostService};
use crate::AppState;

/// Create posts router
///
/// Routes:
/// - GET / - List posts (cursor-paginated, public)
/// - POST / - Create post
/// - GET /:id - Get post (public)
/// - PATCH /:id - Update post (owner only)
/// - DELETE /:id - Delete post (owner only)
pub fn posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
}

// =============================================================================
// DTOs
// =============================================================================

/// Listing query parameters
///
/// Both parameters arrive as strings and are parsed leniently: a
/// malformed cursor or page size is ignored, not rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub cursor: Option<String>,
}

/// A post as serialized in responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A listed post enriched with its author's display fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_picture: String,
}

impl From<PostWithAuthor> for PostListItem {
    fn from(post: PostWithAuthor) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
            author_name: post.author_name,
            author_picture: post.author_picture,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListPostsResponse {
    posts: Vec<PostListItem>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /posts
///
/// Cursor-paginated listing, newest ID first. No has-more signal is
/// returned; callers compare the row count against the requested page
/// size and pass the last row's ID as the next cursor.
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListPostsResponse>, AppError> {
    let page_size = query.page_size.as_deref().and_then(|v| v.parse().ok());
    let cursor = query.cursor.as_deref().and_then(|v| v.parse().ok());

    let posts = PostService::new(state.db.clone())
        .list(page_size, cursor)
        .await?;

    Ok(Json(ListPostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// GET /posts/:id
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let post = PostService::new(state.db.clone()).get(id).await?;

    Ok(Json(
        serde_json::json!({ "post": PostResponse::from(post) }),
    ))
}

/// POST /posts
async fn create_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<PostPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let post = PostService::new(state.db.clone())
        .create(&session.user_id, payload)
        .await?;

    tracing::debug!(post_id = post.id, user_id = %session.user_id, "post created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "msg": "success", "postId": post.id })),
    ))
}

/// PATCH /posts/:id
async fn update_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PostPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    PostService::new(state.db.clone())
        .update(&session.user_id, id, payload)
        .await?;

    Ok(Json(serde_json::json!({ "msg": "success" })))
}

/// DELETE /posts/:id
async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    PostService::new(state.db.clone())
        .delete(&session.user_id, id)
        .await?;

    Ok(Json(serde_json::json!({ "msg": "success" })))
}
