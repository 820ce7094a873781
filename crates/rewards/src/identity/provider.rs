//! Shared slot for the discovered client, filled once by the discovery task.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::info;

use super::client::{IdentitySettings, OidcClient};
use super::error::IdentityError;
use super::lifecycle::Lifecycle;

/// Lock-free handle to the OIDC client.
///
/// Empty until discovery completes; request handlers see
/// [`IdentityError::NotReady`] until then.
#[derive(Clone, Default)]
pub struct Provider {
    client: Arc<ArcSwapOption<OidcClient>>,
}

impl Provider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, client: OidcClient) {
        self.client.store(Some(Arc::new(client)));
    }

    /// # Errors
    ///
    /// Returns [`IdentityError::NotReady`] before discovery has completed.
    pub fn current(&self) -> Result<Arc<OidcClient>, IdentityError> {
        self.client.load_full().ok_or(IdentityError::NotReady)
    }
}

/// Spawn provider discovery.
///
/// On success the client is installed in `provider` and `ready` fires. On
/// failure the error is reported on the lifecycle error channel; discovery is
/// not retried and `ready` never fires.
pub fn start(
    settings: IdentitySettings,
    provider: Provider,
    lifecycle: Lifecycle,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(issuer = %settings.issuer, "discovering identity provider");
        match OidcClient::discover(&settings).await {
            Ok(client) => {
                provider.install(client);
                lifecycle.ready();
            }
            Err(e) => lifecycle.error(e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::client::tests::{mount_provider, settings_for};
    use crate::identity::lifecycle;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn empty_provider_is_not_ready() {
        let provider = Provider::new();
        assert!(matches!(provider.current(), Err(IdentityError::NotReady)));
    }

    #[tokio::test]
    async fn successful_discovery_installs_client_then_signals_ready() {
        let server = MockServer::start().await;
        mount_provider(&server).await;

        let provider = Provider::new();
        let (lifecycle, signals) = lifecycle::channel();
        start(settings_for(&server), provider.clone(), lifecycle)
            .await
            .unwrap();

        signals.ready.wait().await.unwrap();
        assert!(provider.current().is_ok());
    }

    #[tokio::test]
    async fn failed_discovery_reports_error_and_never_signals_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Provider::new();
        let (lifecycle, mut signals) = lifecycle::channel();
        let _keep_alive = lifecycle.clone();
        start(settings_for(&server), provider.clone(), lifecycle)
            .await
            .unwrap();

        assert!(matches!(
            signals.errors.next().await,
            Some(IdentityError::Discovery(_))
        ));
        assert!(matches!(provider.current(), Err(IdentityError::NotReady)));
        let waited = tokio::time::timeout(Duration::from_millis(100), signals.ready.wait()).await;
        assert!(waited.is_err(), "ready must not fire after a failed discovery");
    }
}
