//! Axum middleware layers applied to the router.
//!
//! Outermost first: compression, timeout, request tracing, the session
//! manager, then [`identity::attach_user`] which needs the session in place.

use std::time::Duration;

use axum::Router;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::state::AppState;
use crate::identity;
use crate::session::{self, SessionSettings};

/// Per-request timeout. Also bounds the token exchange inside the callback.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrap `router` in the shared middleware stack.
pub fn apply(router: Router<AppState>, sessions: &SessionSettings) -> Router<AppState> {
    router
        .layer(axum::middleware::from_fn(identity::attach_user))
        .layer(session::layer(sessions))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
}
