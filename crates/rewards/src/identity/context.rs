//! Request-scoped user identity.
//!
//! [`attach_user`] runs inside the session layer and copies a still-valid
//! [`UserContext`] from the session into request extensions. Handlers read it
//! back with the [`CurrentUser`] extractor.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use common::UserContext;
use tower_sessions::Session;
use tracing::{debug, warn};

use super::client::unix_now;
use crate::session::USER_KEY;

pub async fn attach_user(session: Session, mut req: Request, next: Next) -> Response {
    match session.get::<UserContext>(USER_KEY).await {
        Ok(Some(user)) if user.is_valid_at(unix_now()) => {
            req.extensions_mut().insert(user);
        }
        Ok(Some(_)) => {
            debug!("access token expired; dropping identity from session");
            if let Err(e) = session.remove::<UserContext>(USER_KEY).await {
                warn!(error = %e, "failed to drop expired identity");
            }
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to load session"),
    }
    next.run(req).await
}

/// The signed-in user, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserContext>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<UserContext>().cloned()))
    }
}
