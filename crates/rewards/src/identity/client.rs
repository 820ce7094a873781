//! Thin wrapper over the `openidconnect` client discovered from the issuer.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use common::{TokenSet, UserContext, UserInfo};
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreProviderMetadata, CoreUserInfoClaims,
};
use openidconnect::{
    reqwest, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet,
    EndpointNotSet, EndpointSet, IssuerUrl, Nonce, OAuth2TokenResponse, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::error::IdentityError;

/// Client type produced by discovery: authorization endpoint known, token and
/// userinfo endpoints present only if the provider advertises them.
type DiscoveredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Everything needed to talk to the provider.
#[derive(Clone)]
pub struct IdentitySettings {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
}

impl fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Secrets generated when a login starts, kept in the session until the
/// provider redirects back.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub state: String,
    pub nonce: String,
    pub pkce_verifier: String,
}

impl PendingLogin {
    pub fn matches_state(&self, state: &str) -> bool {
        self.state == state
    }
}

impl fmt::Debug for PendingLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PendingLogin([REDACTED])")
    }
}

pub struct OidcClient {
    inner: DiscoveredClient,
    http: reqwest::Client,
    scopes: Vec<String>,
}

impl OidcClient {
    /// Fetch provider metadata and signing keys from the issuer.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Discovery`] if the issuer is malformed, cannot
    /// be reached, or serves metadata for a different issuer.
    pub async fn discover(settings: &IdentitySettings) -> Result<Self, IdentityError> {
        let http = reqwest::ClientBuilder::new()
            // Provider endpoints are used as discovered, never via redirects.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| IdentityError::Discovery(e.to_string()))?;

        let issuer = IssuerUrl::new(settings.issuer.clone())
            .map_err(|e| IdentityError::Discovery(format!("invalid issuer: {e}")))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http)
            .await
            .map_err(|e| IdentityError::Discovery(e.to_string()))?;

        let inner = CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(settings.client_id.clone()),
            Some(ClientSecret::new(settings.client_secret.clone())),
        )
        .set_redirect_uri(RedirectUrl::from_url(settings.redirect_uri.clone()));

        info!(issuer = %settings.issuer, "identity provider discovered");

        Ok(Self {
            inner,
            http,
            scopes: settings.scopes.clone(),
        })
    }

    /// Build the provider authorization URL for a new login.
    ///
    /// The `openid` scope is always sent by the flow itself; configured scopes
    /// are added on top of it.
    pub fn authorization_request(&self) -> (Url, PendingLogin) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self.inner.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            CsrfToken::new_random,
            Nonce::new_random,
        );
        for scope in self.scopes.iter().filter(|s| s.as_str() != "openid") {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (url, csrf_token, nonce) = request.set_pkce_challenge(pkce_challenge).url();

        let pending = PendingLogin {
            state: csrf_token.secret().clone(),
            nonce: nonce.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };
        (url, pending)
    }

    /// Redeem an authorization code and assemble the user's identity from the
    /// verified ID token, enriched with userinfo claims when available.
    pub async fn exchange_code(
        &self,
        code: String,
        pending: PendingLogin,
    ) -> Result<UserContext, IdentityError> {
        let token_response = self
            .inner
            .exchange_code(AuthorizationCode::new(code))
            .map_err(|e| IdentityError::Exchange(e.to_string()))?
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&self.http)
            .await
            .map_err(|e| IdentityError::Exchange(e.to_string()))?;

        let id_token = token_response
            .id_token()
            .ok_or(IdentityError::MissingIdToken)?;
        let verifier = self.inner.id_token_verifier();
        let claims = id_token
            .claims(&verifier, &Nonce::new(pending.nonce))
            .map_err(|e| IdentityError::InvalidIdToken(e.to_string()))?;

        let mut merged = match serde_json::to_value(claims) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return Err(IdentityError::InvalidIdToken(
                    "claims are not a JSON object".into(),
                ))
            }
        };

        match self
            .inner
            .user_info(token_response.access_token().to_owned(), None)
        {
            Ok(request) => {
                let userinfo: CoreUserInfoClaims = request
                    .request_async(&self.http)
                    .await
                    .map_err(|e| IdentityError::UserInfo(e.to_string()))?;
                if let Ok(serde_json::Value::Object(extra)) = serde_json::to_value(&userinfo) {
                    merged.extend(extra);
                }
            }
            Err(e) => debug!(error = %e, "provider has no userinfo endpoint; using ID token claims"),
        }

        let userinfo: UserInfo = serde_json::from_value(serde_json::Value::Object(merged))
            .map_err(|e| IdentityError::InvalidIdToken(e.to_string()))?;

        let expires_at = token_response
            .expires_in()
            .map(|lifetime| unix_now().saturating_add(lifetime.as_secs()));

        Ok(UserContext {
            userinfo,
            tokens: TokenSet {
                access_token: token_response.access_token().secret().clone(),
                id_token: Some(id_token.to_string()),
                expires_at,
            },
        })
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mount discovery and an empty JWKS on `server`, advertising an
    /// end-session endpoint that nothing in this service should ever call.
    pub(crate) async fn mount_provider(server: &MockServer) {
        mount_provider_with_keys(server, json!({ "keys": [] })).await;
    }

    /// Like [`mount_provider`], serving `jwks` as the signing key set.
    pub(crate) async fn mount_provider_with_keys(server: &MockServer, jwks: serde_json::Value) {
        let issuer = server.uri();
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issuer": issuer,
                "authorization_endpoint": format!("{issuer}/oauth2/v1/authorize"),
                "token_endpoint": format!("{issuer}/oauth2/v1/token"),
                "userinfo_endpoint": format!("{issuer}/oauth2/v1/userinfo"),
                "end_session_endpoint": format!("{issuer}/oauth2/v1/logout"),
                "jwks_uri": format!("{issuer}/oauth2/v1/keys"),
                "response_types_supported": ["code"],
                "subject_types_supported": ["public"],
                "id_token_signing_alg_values_supported": ["RS256"]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v1/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
            .mount(server)
            .await;
    }

    pub(crate) fn settings_for(server: &MockServer) -> IdentitySettings {
        IdentitySettings {
            issuer: server.uri(),
            client_id: "0oa-client".into(),
            client_secret: "shh".into(),
            redirect_uri: Url::parse("http://localhost:8081/authorization-code/callback").unwrap(),
            scopes: vec!["openid".into(), "profile".into()],
        }
    }

    #[tokio::test]
    async fn discovers_and_builds_authorization_url() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let client = OidcClient::discover(&settings_for(&server)).await.unwrap();
        let (url, pending) = client.authorization_request();

        assert!(url.as_str().starts_with(&format!("{}/oauth2/v1/authorize", server.uri())));
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "0oa-client");
        assert_eq!(query["scope"], "openid profile");
        assert_eq!(query["state"], pending.state);
        assert_eq!(query["nonce"], pending.nonce);
        assert_eq!(query["code_challenge_method"], "S256");
        assert_eq!(
            query["redirect_uri"],
            "http://localhost:8081/authorization-code/callback"
        );
        assert!(!pending.pkce_verifier.is_empty());
    }

    #[tokio::test]
    async fn each_login_gets_fresh_secrets() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let client = OidcClient::discover(&settings_for(&server)).await.unwrap();
        let (_, first) = client.authorization_request();
        let (_, second) = client.authorization_request();
        assert_ne!(first.state, second.state);
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.pkce_verifier, second.pkce_verifier);
    }

    #[tokio::test]
    async fn discovery_fails_on_issuer_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issuer": "https://someone-else.example",
                "authorization_endpoint": "https://someone-else.example/authorize",
                "jwks_uri": format!("{}/oauth2/v1/keys", server.uri()),
                "response_types_supported": ["code"],
                "subject_types_supported": ["public"],
                "id_token_signing_alg_values_supported": ["RS256"]
            })))
            .mount(&server)
            .await;

        let result = OidcClient::discover(&settings_for(&server)).await;
        assert!(matches!(result, Err(IdentityError::Discovery(_))));
    }

    #[tokio::test]
    async fn discovery_fails_when_provider_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = OidcClient::discover(&settings_for(&server)).await;
        assert!(matches!(result, Err(IdentityError::Discovery(_))));
    }

    #[test]
    fn pending_login_is_redacted_and_compares_state() {
        let pending = PendingLogin {
            state: "abc".into(),
            nonce: "n".into(),
            pkce_verifier: "v".into(),
        };
        assert!(pending.matches_state("abc"));
        assert!(!pending.matches_state("abd"));
        assert_eq!(format!("{pending:?}"), "PendingLogin([REDACTED])");
    }

    #[test]
    fn settings_debug_redacts_secret() {
        let settings = IdentitySettings {
            issuer: "https://tc3.okta.example".into(),
            client_id: "id".into(),
            client_secret: "hunter2".into(),
            redirect_uri: Url::parse("http://localhost/cb").unwrap(),
            scopes: vec![],
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
