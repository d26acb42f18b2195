// Post repository implementation

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{FeedPost, Page, Post};
use tracing::instrument;
use uuid::Uuid;

/// Repository for post-related database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    /// Create a new PostRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new post
    #[instrument(skip(self, post))]
    pub async fn create(&self, post: &Post) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(self.pool.pool())
        .await?;

        tracing::info!(post_id = %post.id, user_id = %post.user_id, "Post created");
        Ok(())
    }

    /// Find a post by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(post)
    }

    /// Check whether a post with the given ID exists
    #[instrument(skip(self))]
    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(exists)
    }

    /// The feed: latest posts joined with their author's username,
    /// newest first
    #[instrument(skip(self))]
    pub async fn latest(&self, page: Page) -> Result<Vec<FeedPost>, DatabaseError> {
        let posts = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT p.id, p.user_id, u.username, p.content, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(posts)
    }
}
