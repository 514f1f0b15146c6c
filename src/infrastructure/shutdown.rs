//! Process shutdown signals.
//!
//! Signal handlers are installed as soon as [`listen`] is called, so an
//! interrupt that arrives while a cycle is running is remembered and honored
//! once the cycle finishes.

use tokio::sync::watch;
use tracing::{error, info};

/// Install Ctrl-C (and SIGTERM on Unix) handlers.
///
/// The returned receiver flips to `true` once a signal arrives.
#[must_use]
pub fn listen() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => {
                info!(signal = name, "Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!(error = %e, "Unable to listen for shutdown signal"),
        }
    });
    shutdown_rx
}

/// Resolve once `rx` reports shutdown, or its sender is gone.
pub async fn requested(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "ctrl-c")
}
