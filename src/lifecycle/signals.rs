//! OS signal handling.
//!
//! The first Ctrl-C requests a graceful stop; a second one exits immediately.

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task translating Ctrl-C into shutdown.
pub fn spawn_signal_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Unable to listen for Ctrl-C");
            return;
        }
        tracing::warn!("Interrupt received, finishing current step before exit");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt, exiting now");
            std::process::exit(130);
        }
    });
}
