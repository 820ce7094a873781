//! Axum request handlers for the application-owned endpoints.

use axum::{
    extract::State,
    response::{Html, Response},
};
use common::{Offer, UserContext};
use serde::Serialize;
use tower_sessions::Session;
use tracing::warn;

use super::response::{found, HttpError};
use super::state::AppState;
use crate::identity::{CurrentUser, LOGIN_PATH};
use crate::render;
use crate::session;

pub const LOGOUT_PATH: &str = "/logout";

/// Data bound to the `home` template.
#[derive(Debug, Serialize)]
struct HomePage<'a> {
    user: Option<UserView<'a>>,
    offer: &'a Offer,
    login_path: &'static str,
    logout_path: &'static str,
}

#[derive(Debug, Serialize)]
struct UserView<'a> {
    name: &'a str,
}

impl<'a> HomePage<'a> {
    fn new(user: Option<&'a UserContext>, offer: &'a Offer) -> Self {
        Self {
            user: user.map(|u| UserView {
                name: u.display_name(),
            }),
            offer,
            login_path: LOGIN_PATH,
            logout_path: LOGOUT_PATH,
        }
    }
}

/// `GET /`: landing page with a freshly drawn offer.
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, HttpError> {
    let offer = Offer::draw(&mut rand::rng());
    let page = HomePage::new(user.as_ref(), &offer);
    let html = state.renderer.render(render::HOME, &page)?;
    Ok(Html(html))
}

/// `GET /logout`: drop the local session and go home.
///
/// The provider's end-session endpoint is not called. The workforce SSO
/// session stays alive and the next login completes without a prompt.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = session::clear(&session).await {
        warn!(error = %e, "failed to clear session during logout");
    }
    found("/")
}
