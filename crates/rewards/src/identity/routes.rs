//! Login initiation and authorization-code callback.

use axum::{
    extract::{FromRef, Query, State},
    response::Response,
    routing::get,
    Router,
};
use common::AppError;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use super::client::PendingLogin;
use super::error::IdentityError;
use super::lifecycle::Lifecycle;
use super::provider::Provider;
use crate::server::response::{found, HttpError};
use crate::session::{PENDING_KEY, USER_KEY};

pub const LOGIN_PATH: &str = "/login";
pub const CALLBACK_PATH: &str = "/authorization-code/callback";

/// Where the browser lands after a successful login.
const LOGIN_REDIRECT: &str = "/";

/// State the identity routes need, extracted from the application state.
#[derive(Clone)]
pub struct IdentityState {
    pub provider: Provider,
    pub lifecycle: Lifecycle,
}

/// Identity-owned routes, to be merged ahead of application routes.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    IdentityState: FromRef<S>,
{
    Router::new()
        .route(LOGIN_PATH, get(login))
        .route(CALLBACK_PATH, get(callback))
}

async fn login(
    State(identity): State<IdentityState>,
    session: Session,
) -> Result<Response, HttpError> {
    let client = identity.provider.current()?;
    let (url, pending) = client.authorization_request();
    session
        .insert(PENDING_KEY, &pending)
        .await
        .map_err(IdentityError::from)?;
    Ok(found(url.as_str()))
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn callback(
    State(identity): State<IdentityState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response, HttpError> {
    match complete_login(&identity, &session, params).await {
        Ok(()) => Ok(found(LOGIN_REDIRECT)),
        Err(e) => {
            let app_error = AppError::from(e.clone());
            identity.lifecycle.error(e);
            Err(app_error.into())
        }
    }
}

async fn complete_login(
    identity: &IdentityState,
    session: &Session,
    params: CallbackParams,
) -> Result<(), IdentityError> {
    if let Some(error) = params.error {
        return Err(IdentityError::ProviderRejected {
            error,
            description: params.error_description.unwrap_or_default(),
        });
    }
    let code = params.code.ok_or(IdentityError::MissingParameter("code"))?;
    let state = params.state.ok_or(IdentityError::MissingParameter("state"))?;

    // One-shot: a replayed callback finds nothing to match against.
    let pending: PendingLogin = session
        .remove(PENDING_KEY)
        .await?
        .ok_or(IdentityError::NoPendingLogin)?;
    if !pending.matches_state(&state) {
        return Err(IdentityError::StateMismatch);
    }

    let client = identity.provider.current()?;
    let user = client.exchange_code(code, pending).await?;

    session.cycle_id().await?;
    session.insert(USER_KEY, &user).await?;

    info!(sub = %user.userinfo.sub, "login complete");
    Ok(())
}
