use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, services::TokenClaims, AppState};

/// Validates the bearer token and stashes its claims for handlers.
///
/// Anything wrong with the token itself (missing, malformed, expired, bad
/// signature) is 401; scope decisions happen in handlers and are 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::InvalidToken("missing bearer token".to_string()))?;

    let claims = state
        .jwt
        .validate_access_token(token)
        .map_err(|e| AppError::InvalidToken(e.to_string()))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extractor for the claims validated by [`auth_middleware`].
pub struct AuthUser(pub TokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Auth claims missing from request extensions"
            ))
        })?;

        Ok(AuthUser(claims))
    }
}

/// Scope gate: a valid but underprivileged token is 403, never 401.
pub fn require_any_scope(claims: &TokenClaims, required: &[&str]) -> Result<(), AppError> {
    if claims.has_any_scope(required) {
        return Ok(());
    }

    tracing::warn!(
        subject = %claims.sub,
        granted = ?claims.scope,
        required = ?required,
        "Insufficient scope"
    );
    Err(AppError::InsufficientScope(required.join(" ")))
}
