//! Shared application state injected into every Axum handler.

use axum::extract::FromRef;

use crate::identity::IdentityState;
use crate::render::Renderer;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-backed) so that Axum can clone the
/// state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Compiled page templates.
    pub renderer: Renderer,
    /// Discovered OIDC client slot and lifecycle signals.
    pub identity: IdentityState,
}

impl AppState {
    pub fn new(renderer: Renderer, identity: IdentityState) -> Self {
        Self { renderer, identity }
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}
