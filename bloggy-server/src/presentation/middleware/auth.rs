use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::infrastructure::tokens::TokenService;
use crate::presentation::app_error::AppError;

const MISSING_TOKEN: &str = "missing bearer token";
const INVALID_TOKEN: &str = "invalid or expired bearer token";

/// Identity resolved by the authentication gate, available to handlers via
/// request extensions.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
    pub(crate) email: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized(MISSING_TOKEN))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(session_tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized(MISSING_TOKEN))?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized(MISSING_TOKEN))?;
    let token = parts.next().ok_or(AppError::Unauthorized(MISSING_TOKEN))?;
    if parts.next().is_some() {
        return Err(AppError::Unauthorized(INVALID_TOKEN));
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(INVALID_TOKEN));
    }
    if token.trim().is_empty() {
        return Err(AppError::Unauthorized(MISSING_TOKEN));
    }

    let claims = session_tokens
        .verify(token.trim())
        .map_err(|_| AppError::Unauthorized(INVALID_TOKEN))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
