//! Lifecycle signals emitted by the identity integration.
//!
//! Two channels, created together by [`channel`]:
//!
//! - **ready** fires once, after provider discovery succeeds. The listener
//!   must not bind before it does.
//! - **error** carries non-fatal diagnostics: discovery failures and failed
//!   login round-trips. [`Errors::log_in_background`] drains it into the log.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::error;

use super::error::IdentityError;

/// Every [`Lifecycle`] handle was dropped before `ready` fired.
#[derive(Debug, Error)]
#[error("identity lifecycle closed before signalling ready")]
pub struct LifecycleClosed;

/// Producer side, held by whatever drives the identity integration.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    ready: Arc<watch::Sender<bool>>,
    errors: mpsc::UnboundedSender<IdentityError>,
}

/// Consumer side, split so the composition root can await readiness while a
/// background task drains errors.
#[derive(Debug)]
pub struct Signals {
    pub ready: Ready,
    pub errors: Errors,
}

#[derive(Debug)]
pub struct Ready(watch::Receiver<bool>);

#[derive(Debug)]
pub struct Errors(mpsc::UnboundedReceiver<IdentityError>);

pub fn channel() -> (Lifecycle, Signals) {
    let (ready_tx, ready_rx) = watch::channel(false);
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    let lifecycle = Lifecycle {
        ready: Arc::new(ready_tx),
        errors: error_tx,
    };
    let signals = Signals {
        ready: Ready(ready_rx),
        errors: Errors(error_rx),
    };
    (lifecycle, signals)
}

impl Lifecycle {
    /// Mark the integration ready. Later calls are no-ops.
    pub fn ready(&self) {
        self.ready.send_replace(true);
    }

    /// Report a non-fatal error. Dropped silently if nobody is listening.
    pub fn error(&self, e: IdentityError) {
        let _ = self.errors.send(e);
    }
}

impl Ready {
    /// Resolve once `ready` has fired (immediately if it already has).
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleClosed`] if every producer is dropped first.
    pub async fn wait(mut self) -> Result<(), LifecycleClosed> {
        self.0
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| LifecycleClosed)
    }
}

impl Errors {
    pub async fn next(&mut self) -> Option<IdentityError> {
        self.0.recv().await
    }

    /// Spawn a task that logs every reported error until all producers are gone.
    pub fn log_in_background(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(e) = self.next().await {
                error!(error = %e, "identity provider error");
            }
        })
    }
}
