//! Listener startup gated on identity readiness.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::identity::lifecycle::Ready;

/// Wait for `ready`, then bind `addr` and serve `router` until the process
/// exits.
///
/// Nothing listens on `addr` until `ready` fires, so the first request can
/// always be sent to the provider. If discovery fails `ready` never fires and
/// this future stays pending; the failure itself reaches the log through the
/// lifecycle error channel.
///
/// # Errors
///
/// Returns an error if the lifecycle closes before becoming ready, the address
/// cannot be bound, or the server stops with an I/O error.
pub async fn serve_when_ready(ready: Ready, addr: SocketAddr, router: Router) -> Result<()> {
    ready
        .wait()
        .await
        .context("identity integration shut down before becoming ready")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router).await.context("server stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::lifecycle;
    use axum::routing::get;
    use std::time::Duration;
    use tokio::net::TcpStream;

    async fn free_addr() -> SocketAddr {
        let probe = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        probe.local_addr().unwrap()
    }

    #[tokio::test]
    async fn does_not_bind_before_ready() {
        let addr = free_addr().await;
        let (lifecycle, signals) = lifecycle::channel();
        let router = Router::new().route("/", get(|| async { "ok" }));
        let server = tokio::spawn(serve_when_ready(signals.ready, addr, router));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(TcpStream::connect(addr).await.is_err());

        lifecycle.ready();
        let mut connected = false;
        for _ in 0..100 {
            if TcpStream::connect(addr).await.is_ok() {
                connected = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(connected, "listener never came up after ready");
        server.abort();
    }

    #[tokio::test]
    async fn closed_lifecycle_is_an_error() {
        let addr = free_addr().await;
        let (lifecycle, signals) = lifecycle::channel();
        drop(lifecycle);
        let result = serve_when_ready(signals.ready, addr, Router::new()).await;
        assert!(result.is_err());
    }
}
