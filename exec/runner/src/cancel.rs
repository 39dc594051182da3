//! Signal-scoped cancellation.

use std::io;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A cancellation scope tied to OS interrupt/terminate signals.
///
/// Installing the scope spawns a listener that cancels the shared token
/// exactly once on the first SIGINT or SIGTERM; later signals are no-ops
/// against the already-cancelled token. The listener lives only as long as
/// the scope; dropping it removes the handler, so repeated top-level
/// invocations inside one host process stay independent.
#[derive(Debug)]
pub struct SignalScope {
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl SignalScope {
    /// Install the signal listener. Must be called within a tokio runtime.
    pub fn install() -> io::Result<Self> {
        let token = CancellationToken::new();

        #[cfg(unix)]
        let listener = {
            use tokio::signal::unix::SignalKind;
            use tokio::signal::unix::signal;

            let mut interrupt = signal(SignalKind::interrupt())?;
            let mut terminate = signal(SignalKind::terminate())?;
            let token = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = interrupt.recv() => {}
                    _ = terminate.recv() => {}
                }
                tracing::debug!("termination signal received, cancelling executions");
                token.cancel();
            })
        };

        #[cfg(not(unix))]
        let listener = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            })
        };

        Ok(Self { token, listener })
    }

    /// The token every execution under this scope observes.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for SignalScope {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[cfg(test)]
#[path = "cancel.test.rs"]
mod tests;
