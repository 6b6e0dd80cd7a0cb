use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::app::AppState;
use crate::database::{Comment, CommentRepository, NewComment};
use crate::error::ApiError;
use crate::handlers::{parse_comment_id, MSG_COMMENT_NOT_FOUND};
use crate::middleware::AuthUser;
use crate::validate::{lenient_string, parse_json_body, validate_body};

pub const MSG_NOT_AUTHORIZED: &str = "User not authorized";
pub const MSG_COMMENT_REMOVED: &str = "Comment removed";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateComment {
    // Absent, null and empty are the same violation
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        required(message = "Text is required"),
        length(min = 1, message = "Text is required")
    )]
    pub text: Option<String>,
}

/// POST /api/comments - create a comment owned by the caller
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Comment>, ApiError> {
    let payload: CreateComment = parse_json_body(&headers, &body)?;
    validate_body(&payload)?;

    let comment = state
        .repository
        .create(NewComment {
            text: payload.text.unwrap_or_default(),
            user: auth.user_id,
        })
        .await?;

    tracing::info!("User {} created comment {}", auth.user_id, comment.id);
    Ok(Json(comment))
}

/// DELETE /api/comments/:id - remove a comment the caller owns
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_comment_id(&id)?;

    let comment = state.repository.find_404(id).await?;

    if !comment.is_owned_by(auth.user_id) {
        tracing::warn!(
            "User {} attempted to delete comment {} owned by {}",
            auth.user_id,
            comment.id,
            comment.user
        );
        return Err(ApiError::forbidden(MSG_NOT_AUTHORIZED));
    }

    if !state.repository.delete_by_id(id).await? {
        // Removed concurrently between lookup and delete
        return Err(ApiError::not_found(MSG_COMMENT_NOT_FOUND));
    }

    tracing::info!("User {} removed comment {}", auth.user_id, id);
    Ok(Json(json!({ "msg": MSG_COMMENT_REMOVED })))
}
