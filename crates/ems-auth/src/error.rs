//! Authentication error types.

use ems_core::error::EmsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired session")]
    SessionInvalid,

    #[error("user not found")]
    UserNotFound,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for EmsError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::UserNotFound
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => EmsError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => EmsError::Crypto(msg),
        }
    }
}
