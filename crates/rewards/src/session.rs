//! Server-side sessions keyed by the `tc3-rewards-sid` cookie.
//!
//! Records live in an in-process [`MemoryStore`]. A record is only created once
//! something is written to it, so anonymous browsing never allocates one.

use time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

pub const SESSION_COOKIE: &str = "tc3-rewards-sid";

/// Signed-in user ([`common::UserContext`]).
pub const USER_KEY: &str = "oidc.user";

/// Login in flight ([`crate::identity::client::PendingLogin`]).
pub const PENDING_KEY: &str = "oidc.pending";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Inactivity window before the record and cookie expire.
    pub ttl_secs: u64,
    /// Set the `Secure` cookie attribute; only sensible behind https.
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            secure_cookie: false,
        }
    }
}

pub fn layer(settings: &SessionSettings) -> SessionManagerLayer<MemoryStore> {
    let ttl = i64::try_from(settings.ttl_secs).unwrap_or(i64::MAX);
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(settings.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(ttl)))
}

/// Remove every key from the session, delete its record from the store and
/// expire the cookie.
///
/// Unlike removing known keys one by one, this leaves nothing behind even for
/// keys written by code that did not go through this module.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
