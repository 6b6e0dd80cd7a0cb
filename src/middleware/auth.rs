use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

pub const MSG_NO_TOKEN: &str = "No token, authorization denied";
pub const MSG_INVALID_TOKEN: &str = "Token is not valid";

/// Fallback header for clients that do not send `Authorization: Bearer`
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated principal extracted from the request's JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user.id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).ok_or_else(|| {
            tracing::warn!("Rejected {} {}: no token", parts.method, parts.uri.path());
            ApiError::unauthorized(MSG_NO_TOKEN)
        })?;

        let claims = validate_jwt(&token, &state.config.security.jwt_secret).map_err(|e| {
            tracing::warn!("Rejected {} {}: {}", parts.method, parts.uri.path(), e);
            ApiError::unauthorized(MSG_INVALID_TOKEN)
        })?;

        Ok(AuthUser::from(claims))
    }
}

/// Token from `Authorization: Bearer <jwt>`, else from `x-auth-token`
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = bearer.or_else(|| {
        headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
    })?;

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
