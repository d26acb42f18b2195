use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use common::db::repositories::{ActivityRepository, UserRepository};
use common::models::{ActivityEntry, Page};

use crate::handlers::posts::PageQuery;
use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub activity: Vec<ActivityEntry>,
}

/// A user's activity history: their posts and comments merged, newest first
#[tracing::instrument(skip(state))]
pub async fn user_activity(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SuccessResponse<ActivityResponse>>, ErrorResponse> {
    let page = Page::new(query.offset, query.limit).map_err(ErrorResponse::from)?;

    let users = UserRepository::new(state.db_pool.clone());
    let user_exists = users.exists(user_id).await.map_err(|e| {
        tracing::error!(error = %e, user_id = %user_id, "Failed to look up user");
        ErrorResponse::new("internal_error", "Failed to retrieve activity")
    })?;
    if !user_exists {
        return Err(ErrorResponse::new("not_found", "User not found"));
    }

    let repository = ActivityRepository::new(state.db_pool.clone());
    let activity = repository
        .latest_for_user(user_id, page)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to list activity");
            ErrorResponse::new("internal_error", "Failed to retrieve activity")
        })?;

    tracing::info!(user_id = %user_id, count = activity.len(), "Listed user activity");
    Ok(Json(SuccessResponse::new(ActivityResponse { activity })))
}
