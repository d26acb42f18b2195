use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::db::repositories::{CommentRepository, PostRepository};
use common::errors::DatabaseError;
use common::models::{Comment, DiscussionComment, Page, SessionUser};
use common::validate;

use crate::handlers::posts::{CreatedResponse, PageQuery};
use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DiscussionResponse {
    pub comments: Vec<DiscussionComment>,
}

/// Create a comment under a post, owned by the session user
#[tracing::instrument(skip(state, req))]
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<SuccessResponse<CreatedResponse>>, ErrorResponse> {
    validate::validate_comment_content(&req.content).map_err(ErrorResponse::from)?;

    let now = Utc::now();
    let comment = Comment {
        id: Uuid::new_v4(),
        post_id: req.post_id,
        user_id: Some(session_user.user_id),
        content: req.content,
        created_at: now,
        updated_at: now,
    };

    let repository = CommentRepository::new(state.db_pool.clone());
    repository.create(&comment).await.map_err(|e| {
        tracing::error!(
            error = %e,
            post_id = %req.post_id,
            user_id = %session_user.user_id,
            "Failed to create comment"
        );
        match e {
            // The referenced post does not exist (or the session user is gone)
            DatabaseError::ForeignKeyViolation(_) => {
                ErrorResponse::new("not_found", "Post not found")
            }
            _ => ErrorResponse::new("internal_error", "Failed to create comment"),
        }
    })?;

    Ok(Json(SuccessResponse::new(CreatedResponse {
        id: comment.id,
        created_at: comment.created_at,
    })))
}

/// The discussion under a post: latest comments, newest first
#[tracing::instrument(skip(state))]
pub async fn discussion(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SuccessResponse<DiscussionResponse>>, ErrorResponse> {
    let page = Page::new(query.offset, query.limit).map_err(ErrorResponse::from)?;

    let posts = PostRepository::new(state.db_pool.clone());
    let post_exists = posts.exists(post_id).await.map_err(|e| {
        tracing::error!(error = %e, post_id = %post_id, "Failed to look up post");
        ErrorResponse::new("internal_error", "Failed to retrieve discussion")
    })?;
    if !post_exists {
        return Err(ErrorResponse::new("not_found", "Post not found"));
    }

    let repository = CommentRepository::new(state.db_pool.clone());
    let comments = repository.latest_for_post(post_id, page).await.map_err(|e| {
        tracing::error!(error = %e, post_id = %post_id, "Failed to list discussion");
        ErrorResponse::new("internal_error", "Failed to retrieve discussion")
    })?;

    tracing::info!(post_id = %post_id, count = comments.len(), "Listed discussion comments");
    Ok(Json(SuccessResponse::new(DiscussionResponse { comments })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_deserialization() {
        let json = r#"{
            "post_id": "550e8400-e29b-41d4-a716-446655440000",
            "content": "nice post"
        }"#;
        let req: CreateCommentRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(
            req.post_id.to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(req.content, "nice post");
    }

    #[test]
    fn test_create_comment_request_rejects_bad_uuid() {
        let json = r#"{"post_id": "not-a-uuid", "content": "hi"}"#;
        assert!(serde_json::from_str::<CreateCommentRequest>(json).is_err());
    }
}
