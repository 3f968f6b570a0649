use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Boundary error taxonomy. Every variant maps to exactly one status code and
/// one stable `error` code string, so no two failure categories are
/// indistinguishable on the wire.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid client credentials")]
    InvalidClient,

    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("insufficient scope, required one of: {0}")]
    InsufficientScope(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("dependency unavailable: {0}")]
    Unavailable(String),

    #[error("configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            error_description: Option<String>,
        }

        if let AppError::ConfigError(err) | AppError::InternalError(err) = &self {
            tracing::error!(error = %err, "request failed");
        }

        // Authentication failures carry no sub-reason in the body; the
        // remaining categories may describe themselves.
        let (status, code, description, challenge) = match self {
            AppError::InvalidClient => (
                StatusCode::UNAUTHORIZED,
                "invalid_client",
                None,
                Some(r#"Basic realm="uaa""#),
            ),
            AppError::InvalidGrant(_) => (StatusCode::BAD_REQUEST, "invalid_grant", None, None),
            AppError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                None,
                Some(r#"Bearer error="invalid_token""#),
            ),
            AppError::InsufficientScope(required) => (
                StatusCode::FORBIDDEN,
                "insufficient_scope",
                Some(format!("required one of: {}", required)),
                Some(r#"Bearer error="insufficient_scope""#),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, "not_found", Some(what), None),
            AppError::Unavailable(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "temporarily_unavailable",
                Some(what),
                None,
            ),
            AppError::ConfigError(_) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                None,
                None,
            ),
        };

        let mut res = (
            status,
            Json(ErrorBody {
                error: code,
                error_description: description,
            }),
        )
            .into_response();

        if let Some(challenge) = challenge {
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static(challenge),
            );
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_use_distinct_statuses() {
        assert_eq!(
            AppError::InvalidClient.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidGrant("bad credentials".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidToken("expired".into())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InsufficientScope("write trust".into())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_client_carries_basic_challenge() {
        let res = AppError::InvalidClient.into_response();
        let challenge = res.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }

    #[test]
    fn transient_failures_are_retryable_not_unauthorized() {
        let res = AppError::Unavailable("member store timed out".into()).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
