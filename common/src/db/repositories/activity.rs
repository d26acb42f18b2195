// Activity repository implementation
//
// The activity view is not a table: it is the UNION of a user's posts and
// comments, ordered by recency.

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{ActivityEntry, ActivityKind, Page};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

/// Raw activity row; `kind` is parsed into [`ActivityKind`] after the fetch
#[derive(Debug, FromRow)]
struct ActivityRow {
    id: Uuid,
    kind: String,
    post_id: Option<Uuid>,
    content: String,
    created_at: DateTime<Utc>,
}

/// Repository for the per-user activity view
#[derive(Clone)]
pub struct ActivityRepository {
    pool: DbPool,
}

impl ActivityRepository {
    /// Create a new ActivityRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// A user's merged posts and comments, newest first. For comment rows
    /// `post_id` carries the parent post; for post rows it is NULL.
    #[instrument(skip(self))]
    pub async fn latest_for_user(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<Vec<ActivityEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, kind, post_id, content, created_at
            FROM (
                SELECT p.id, 'post' AS kind, NULL::uuid AS post_id, p.content, p.created_at
                FROM posts p
                WHERE p.user_id = $1
                UNION ALL
                SELECT c.id, 'comment' AS kind, c.post_id, c.content, c.created_at
                FROM comments c
                WHERE c.user_id = $1
            ) activity
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                let kind = row
                    .kind
                    .parse::<ActivityKind>()
                    .map_err(DatabaseError::QueryFailed)?;
                Ok(ActivityEntry {
                    id: row.id,
                    kind,
                    post_id: row.post_id,
                    content: row.content,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}
