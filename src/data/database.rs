//! SQLite database operations
//!
//! All database access goes through this module.
//! Mutations that require ownership are expressed as single conditional
//! statements (`WHERE id = ? AND user_id = ?`) so an authorization check
//! and its write cannot be separated by a concurrent mutation.

use std::path::Path;

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by unique email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Insert a new user
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, provider, provider_account_id, picture, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.provider)
        .bind(&user.provider_account_id)
        .bind(&user.picture)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sync provider-supplied profile fields on repeat login
    ///
    /// Only `name` and `picture` are writable after creation; identity
    /// columns never change.
    pub async fn update_user_profile(
        &self,
        id: &str,
        name: &str,
        picture: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET name = ?, picture = ? WHERE id = ?")
            .bind(name)
            .bind(picture)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Get post by ID
    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Get only the owner of a post
    ///
    /// Used by the ownership guard to distinguish 404 from 403 before
    /// the conditional write runs.
    pub async fn get_post_owner(&self, id: i64) -> Result<Option<String>, AppError> {
        let owner = sqlx::query_scalar::<_, String>("SELECT user_id FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    /// List posts joined with their owners, newest ID first
    ///
    /// Keyset pagination: when `cursor` is set, only posts with a
    /// strictly smaller ID are returned. The inner join drops any post
    /// whose owner row is missing.
    ///
    /// # Arguments
    /// * `limit` - Maximum number of results
    /// * `cursor` - Exclusive upper bound on post ID (for pagination)
    pub async fn list_posts(
        &self,
        limit: i64,
        cursor: Option<i64>,
    ) -> Result<Vec<PostWithAuthor>, AppError> {
        let posts = if let Some(cursor) = cursor {
            sqlx::query_as::<_, PostWithAuthor>(
                r#"
                SELECT p.id, p.title, p.content, p.user_id, p.created_at, p.updated_at,
                       u.name AS author_name, u.picture AS author_picture
                FROM posts p
                JOIN users u ON u.id = p.user_id
                WHERE p.id < ?
                ORDER BY p.id DESC
                LIMIT ?
                "#,
            )
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, PostWithAuthor>(
                r#"
                SELECT p.id, p.title, p.content, p.user_id, p.created_at, p.updated_at,
                       u.name AS author_name, u.picture AS author_picture
                FROM posts p
                JOIN users u ON u.id = p.user_id
                ORDER BY p.id DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(posts)
    }

    /// Insert a new post owned by `user_id`
    ///
    /// # Returns
    /// The created post, including its assigned sequential ID
    pub async fn insert_post(
        &self,
        title: &str,
        content: &str,
        user_id: &str,
    ) -> Result<Post, AppError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Update a post if and only if `owner` still owns it
    ///
    /// # Returns
    /// `true` if a row was updated, `false` if the post no longer
    /// exists or changed owner since the guard's lookup
    pub async fn update_post_owned(
        &self,
        id: i64,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete a post if and only if `owner` still owns it
    ///
    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_post_owned(&self, id: i64, owner: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
