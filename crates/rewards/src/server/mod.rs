//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Bind the listener, but only once the identity integration is ready.
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;
