//! Axum router construction.

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use super::{handlers, middleware, state::AppState};
use crate::identity;
use crate::session::SessionSettings;

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, sessions: &SessionSettings, static_dir: &Path) -> Router {
    middleware::apply(routes(static_dir), sessions).with_state(state)
}

/// Routes without middleware. Anything unmatched is looked up under
/// `static_dir`, and a missing file is a plain 404.
pub(crate) fn routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route(handlers::LOGOUT_PATH, get(handlers::logout))
        .merge(identity::routes())
        .fallback_service(ServeDir::new(static_dir))
}
