// Handlers grouped by security tier:
// public (no token) and protected (valid JWT required).
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

pub const MSG_COMMENT_NOT_FOUND: &str = "Comment not found";

/// Path ids that are not UUIDs cannot name a stored comment
pub(crate) fn parse_comment_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(MSG_COMMENT_NOT_FOUND))
}
