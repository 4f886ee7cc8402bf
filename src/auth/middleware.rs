//! Authentication middleware for axum.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::{Claims, JwtManager};
use crate::error::{AppError, AppResult};

/// Extract and validate JWT token from request.
///
/// Expects `Authorization: Bearer <token>` header.
pub async fn require_jwt(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let claims = jwt_manager.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    // Add claims to request extensions for handlers to access
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// The authenticated account, if `require_jwt` ran for this request.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Claims>);

impl Caller {
    /// Allow the request when unauthenticated routing is in effect, or when
    /// the token belongs to `account_id`.
    pub fn ensure_account(&self, account_id: i32) -> AppResult<()> {
        match &self.0 {
            Some(claims) if claims.sub != account_id => Err(AppError::Forbidden(format!(
                "Token does not grant access to account {}",
                account_id
            ))),
            _ => Ok(()),
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(parts.extensions.get::<Claims>().cloned()))
    }
}
