// Comment repository implementation

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{Comment, DiscussionComment, Page};
use tracing::instrument;
use uuid::Uuid;

/// Repository for comment-related database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    /// Create a new CommentRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new comment. A missing parent post surfaces as
    /// `DatabaseError::ForeignKeyViolation`.
    #[instrument(skip(self, comment))]
    pub async fn create(&self, comment: &Comment) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(self.pool.pool())
        .await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            "Comment created"
        );
        Ok(())
    }

    /// The discussion under a post: latest comments with the author's
    /// username where the author still exists, newest first
    #[instrument(skip(self))]
    pub async fn latest_for_post(
        &self,
        post_id: Uuid,
        page: Page,
    ) -> Result<Vec<DiscussionComment>, DatabaseError> {
        let comments = sqlx::query_as::<_, DiscussionComment>(
            r#"
            SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(comments)
    }
}
