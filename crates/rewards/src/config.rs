//! Configuration loading and validation for the storefront service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::identity::IdentitySettings;
use crate::session::SessionSettings;

/// Scopes requested from the identity provider.
pub const SCOPES: &[&str] = &["openid", "profile"];

/// Validated storefront configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    /// Okta org URI, used as the OIDC issuer. **Required.**
    pub okta_org_uri: String,

    /// OAuth2 client id registered with the org. **Required.**
    pub okta_client_id: String,

    /// OAuth2 client secret. **Required.**
    pub okta_client_secret: String,

    /// Externally visible base URL; the callback URI is derived from it.
    /// Defaults to `http://localhost:{APP_PORT}`.
    #[serde(default)]
    pub app_base_url: Option<String>,

    /// Directory served verbatim for paths no route claims.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Inactivity window after which a session is dropped.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_app_port() -> u16 {
    8081
}
fn default_static_dir() -> String {
    "public".into()
}
fn default_session_ttl() -> u64 {
    3600
}
fn default_log_level() -> String {
    "info".into()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_port", &self.app_port)
            .field("okta_org_uri", &self.okta_org_uri)
            .field("okta_client_id", &self.okta_client_id)
            .field("okta_client_secret", &"[REDACTED]")
            .field("app_base_url", &self.app_base_url)
            .field("static_dir", &self.static_dir)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.okta_org_uri, "OKTA_ORG_URI")?;
        ensure_non_empty(&self.okta_client_id, "OKTA_CLIENT_ID")?;
        ensure_non_empty(&self.okta_client_secret, "OKTA_CLIENT_SECRET")?;

        Url::parse(&self.okta_org_uri).context("OKTA_ORG_URI must be an absolute URL")?;
        self.base_url()?;

        if self.session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be > 0");
        }
        Ok(())
    }

    /// Base URL the browser uses to reach this service.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match &self.app_base_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_owned(),
            _ => format!("http://localhost:{}", self.app_port),
        };
        Url::parse(&raw).with_context(|| format!("APP_BASE_URL is not a valid URL: {raw}"))
    }

    /// Settings handed to the identity layer.
    pub fn identity(&self) -> Result<IdentitySettings> {
        let redirect_uri = self
            .base_url()?
            .join(crate::identity::CALLBACK_PATH)
            .context("failed to derive the OIDC callback URI from APP_BASE_URL")?;

        Ok(IdentitySettings {
            issuer: self.okta_org_uri.trim_end_matches('/').to_owned(),
            client_id: self.okta_client_id.clone(),
            client_secret: self.okta_client_secret.clone(),
            redirect_uri,
            scopes: SCOPES.iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    /// Settings handed to the session layer.
    pub fn session(&self) -> Result<SessionSettings> {
        Ok(SessionSettings {
            ttl_secs: self.session_ttl_secs,
            secure_cookie: self.base_url()?.scheme() == "https",
        })
    }

    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(&self.static_dir)
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
