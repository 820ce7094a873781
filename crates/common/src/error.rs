//! Common error types shared across crates.

use thiserror::Error;

/// Top-level application error type.
///
/// Variants map to HTTP status codes returned to browsers:
/// - [`AppError::BadRequest`] → 400
/// - [`AppError::Unauthorized`] → 401
/// - [`AppError::Render`] → 500
/// - [`AppError::Session`] → 500
/// - [`AppError::Identity`] → 502
/// - [`AppError::Unavailable`] → 503
#[derive(Debug, Error)]
pub enum AppError {
    /// The request was malformed, e.g. a callback without `code` or `state`.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The identity provider rejected the login, or the login round-trip
    /// could not be matched to this browser session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A template failed to render.
    #[error("render failure: {0}")]
    Render(String),

    /// The session store failed to load, save or delete a record.
    #[error("session failure: {0}")]
    Session(String),

    /// The identity provider could not be reached or returned an unusable answer.
    #[error("identity provider failure: {0}")]
    Identity(String),

    /// The identity integration has not finished discovery yet.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Render(_) => 500,
            AppError::Session(_) => 500,
            AppError::Identity(_) => 502,
            AppError::Unavailable(_) => 503,
        }
    }
}
