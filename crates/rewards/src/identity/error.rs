//! Errors raised by the OIDC integration.

use common::AppError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// Provider metadata could not be fetched or parsed at startup.
    #[error("provider discovery failed: {0}")]
    Discovery(String),

    /// A login route was hit before discovery completed.
    #[error("identity provider not ready")]
    NotReady,

    /// The provider redirected back with an `error` parameter.
    #[error("provider rejected the login: {error}: {description}")]
    ProviderRejected { error: String, description: String },

    #[error("callback is missing the `{0}` parameter")]
    MissingParameter(&'static str),

    /// The callback arrived without a login started from this session.
    #[error("no login in progress for this session")]
    NoPendingLogin,

    #[error("callback state does not match the login in progress")]
    StateMismatch,

    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("token response did not include an ID token")]
    MissingIdToken,

    #[error("ID token failed verification: {0}")]
    InvalidIdToken(String),

    #[error("userinfo request failed: {0}")]
    UserInfo(String),

    #[error("session store failure: {0}")]
    Session(String),
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        let msg = e.to_string();
        match e {
            IdentityError::NotReady => AppError::Unavailable(msg),
            IdentityError::MissingParameter(_) => AppError::BadRequest(msg),
            IdentityError::ProviderRejected { .. }
            | IdentityError::NoPendingLogin
            | IdentityError::StateMismatch
            | IdentityError::InvalidIdToken(_) => AppError::Unauthorized(msg),
            IdentityError::Session(_) => AppError::Session(msg),
            IdentityError::Discovery(_)
            | IdentityError::Exchange(_)
            | IdentityError::MissingIdToken
            | IdentityError::UserInfo(_) => AppError::Identity(msg),
        }
    }
}

impl From<tower_sessions::session::Error> for IdentityError {
    fn from(e: tower_sessions::session::Error) -> Self {
        IdentityError::Session(e.to_string())
    }
}
