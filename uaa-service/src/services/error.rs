use thiserror::Error;

use crate::error::AppError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Unknown client, bad secret, or a client not provisioned for the grant.
    /// Callers cannot tell which.
    #[error("client authentication failed")]
    InvalidClient,

    /// Unknown user or wrong password. A single value so the two cases cannot
    /// drift apart and leak which one occurred.
    #[error("resource owner authentication failed")]
    InvalidGrant,

    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    #[error("member not found")]
    MemberNotFound,

    #[error("member store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidClient => AppError::InvalidClient,
            ServiceError::InvalidGrant => {
                AppError::InvalidGrant("resource owner authentication failed".to_string())
            }
            ServiceError::UnsupportedGrantType(grant) => {
                AppError::InvalidGrant(format!("unsupported grant type: {}", grant))
            }
            ServiceError::MemberNotFound => AppError::NotFound("member".to_string()),
            ServiceError::StoreUnavailable(what) => AppError::Unavailable(what),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
