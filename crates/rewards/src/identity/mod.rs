//! OIDC authorization-code integration with the workforce identity provider.
//!
//! # Responsibilities
//! - Discover the provider at startup and signal readiness ([`lifecycle`]).
//! - Own the login-initiation and callback routes ([`routes`]).
//! - Attach the signed-in user to each request ([`context`]).
//!
//! Logging out is purely local (see `server::handlers::logout`): the
//! provider's end-session endpoint is never called, so the provider session
//! outlives the local one and the next login completes without a prompt.

pub mod client;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod routes;

pub use client::IdentitySettings;
pub use context::{attach_user, CurrentUser};
pub use error::IdentityError;
pub use provider::{start, Provider};
pub use routes::{routes, IdentityState, CALLBACK_PATH, LOGIN_PATH};
