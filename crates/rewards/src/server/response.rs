//! Response helpers shared by application and identity handlers.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use common::AppError;
use tracing::{error, warn};

use crate::identity::IdentityError;
use crate::render::RenderError;

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// An [`AppError`] on its way to the browser.
///
/// Only the status and its reason phrase reach the client; the error detail
/// is logged.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(e: AppError) -> Self {
        HttpError(e)
    }
}

impl From<IdentityError> for HttpError {
    fn from(e: IdentityError) -> Self {
        HttpError(e.into())
    }
}

impl From<RenderError> for HttpError {
    fn from(e: RenderError) -> Self {
        HttpError(e.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, Html(error_page(status))).into_response()
    }
}

fn error_page(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{code} {reason}</title></head>\
         <body><h1>{code} {reason}</h1><p><a href=\"/\">Back to TC3 Rewards</a></p></body></html>\n",
        code = status.as_u16(),
    )
}
