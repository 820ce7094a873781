//! Identity of a signed-in user, as stored in the session after a successful
//! authorization-code exchange.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Claims describing the signed-in user.
///
/// The well-known profile claims are lifted into fields; anything else the
/// provider returns is kept verbatim in `additional`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub additional: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            name: None,
            preferred_username: None,
            email: None,
            additional: serde_json::Map::new(),
        }
    }

    /// Best human-readable label: `name`, then `preferred_username`, then
    /// `email`, falling back to the subject identifier.
    pub fn display_name(&self) -> &str {
        [&self.name, &self.preferred_username, &self.email]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or(self.sub.as_str())
    }
}

/// Tokens returned by the provider's token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Access-token expiry as unix seconds, when the provider reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl TokenSet {
    /// A token without a reported lifetime never expires locally; the session
    /// TTL still bounds it.
    pub fn is_expired_at(&self, now_unix: u64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_unix)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Request-scoped identity attached to requests from a signed-in browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub userinfo: UserInfo,
    pub tokens: TokenSet,
}

impl UserContext {
    pub fn display_name(&self) -> &str {
        self.userinfo.display_name()
    }

    pub fn is_valid_at(&self, now_unix: u64) -> bool {
        !self.tokens.is_expired_at(now_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(expires_at: Option<u64>) -> TokenSet {
        TokenSet {
            access_token: "at-secret".into(),
            id_token: Some("idt-secret".into()),
            expires_at,
        }
    }

    #[test]
    fn display_name_prefers_name() {
        let mut info = UserInfo::new("00u1");
        info.email = Some("ada@example.com".into());
        info.name = Some("Ada Lovelace".into());
        assert_eq!(info.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_skips_blank_claims() {
        let mut info = UserInfo::new("00u1");
        info.name = Some("  ".into());
        info.preferred_username = Some("ada@corp".into());
        assert_eq!(info.display_name(), "ada@corp");
    }

    #[test]
    fn display_name_falls_back_to_subject() {
        assert_eq!(UserInfo::new("00u1").display_name(), "00u1");
    }

    #[test]
    fn userinfo_keeps_unknown_claims() {
        let info: UserInfo = serde_json::from_value(json!({
            "sub": "00u1",
            "name": "Ada",
            "locale": "en-GB",
            "zoneinfo": "Europe/London"
        }))
        .unwrap();
        assert_eq!(info.name.as_deref(), Some("Ada"));
        assert_eq!(info.additional["locale"], "en-GB");
        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["zoneinfo"], "Europe/London");
    }

    #[test]
    fn expiry() {
        assert!(!tokens(None).is_expired_at(u64::MAX));
        assert!(!tokens(Some(100)).is_expired_at(99));
        assert!(tokens(Some(100)).is_expired_at(100));
    }

    #[test]
    fn token_set_redacted_in_debug() {
        let out = format!("{:?}", tokens(Some(1)));
        assert!(out.contains("REDACTED"));
        assert!(!out.contains("at-secret"));
        assert!(!out.contains("idt-secret"));
    }
}
