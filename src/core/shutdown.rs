//! # OS signal handling for process shutdown.
//!
//! Provides [`wait_for_shutdown_signal`] an async helper that completes when the
//! launcher receives a termination signal. The binary turns it into a
//! cancellation of the root token, which makes the control loop cancel the
//! supervised program, wait for it and power the display off.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd)
//! - `SIGQUIT`
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Cancels `token` on the first termination signal.
///
/// Returns immediately if `token` is cancelled by someone else first.
pub async fn cancel_on_signal(token: CancellationToken) {
    tokio::select! {
        res = wait_for_shutdown_signal() => match res {
            Ok(()) => {
                info!("shutdown requested");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for shutdown signals"),
        },
        _ = token.cancelled() => {}
    }
}
