use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::{Comment, CommentRepository};
use crate::error::ApiError;
use crate::handlers::{parse_comment_id, MSG_COMMENT_NOT_FOUND};

/// GET /api/comments - every comment, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.repository.find_all_sorted().await?;
    tracing::debug!("Listed {} comments", comments.len());
    Ok(Json(comments))
}

/// GET /api/comments/:id - a single comment
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_comment_id(&id)?;

    let comment = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MSG_COMMENT_NOT_FOUND))?;

    Ok(Json(comment))
}
