use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::db::repositories::PostRepository;
use common::errors::DatabaseError;
use common::models::{FeedPost, Page, Post, SessionUser};
use common::validate;

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters for paginated list endpoints
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
}

/// Create a post owned by the session user
#[tracing::instrument(skip(state, req))]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<SuccessResponse<CreatedResponse>>, ErrorResponse> {
    validate::validate_post_content(&req.content).map_err(ErrorResponse::from)?;

    let now = Utc::now();
    let post = Post {
        id: Uuid::new_v4(),
        user_id: session_user.user_id,
        content: req.content,
        created_at: now,
        updated_at: now,
    };

    let repository = PostRepository::new(state.db_pool.clone());
    repository.create(&post).await.map_err(|e| {
        tracing::error!(error = %e, user_id = %session_user.user_id, "Failed to create post");
        match e {
            // The session outlived the account
            DatabaseError::ForeignKeyViolation(_) => {
                ErrorResponse::new("conflict", "Session user no longer exists")
            }
            _ => ErrorResponse::new("internal_error", "Failed to create post"),
        }
    })?;

    Ok(Json(SuccessResponse::new(CreatedResponse {
        id: post.id,
        created_at: post.created_at,
    })))
}

/// The feed: latest posts, newest first
#[tracing::instrument(skip(state))]
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SuccessResponse<FeedResponse>>, ErrorResponse> {
    let page = Page::new(query.offset, query.limit).map_err(ErrorResponse::from)?;

    let repository = PostRepository::new(state.db_pool.clone());
    let posts = repository.latest(page).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list feed");
        ErrorResponse::new("internal_error", "Failed to retrieve feed")
    })?;

    tracing::info!(count = posts.len(), "Listed feed posts");
    Ok(Json(SuccessResponse::new(FeedResponse { posts })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_request_deserialization() {
        let json = r#"{"content": "hello world"}"#;
        let req: CreatePostRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.content, "hello world");
    }

    #[test]
    fn test_page_query_fields_are_optional() {
        let query: PageQuery = serde_json::from_str("{}").expect("Failed to deserialize");
        assert!(query.offset.is_none());
        assert!(query.limit.is_none());
    }
}
