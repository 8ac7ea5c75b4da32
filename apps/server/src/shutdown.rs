use std::io;
use tokio::signal;

/// Process signals that end the server.
///
/// Listeners are registered by [`ShutdownSignal::install`], so a signal
/// arriving before anyone awaits [`ShutdownSignal::recv`] is still observed.
#[derive(Debug)]
pub(crate) struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: signal::unix::Signal,
    #[cfg(unix)]
    terminate: signal::unix::Signal,
    #[cfg(unix)]
    quit: signal::unix::Signal,
}

impl ShutdownSignal {
    /// Registers SIGINT, SIGTERM and SIGQUIT listeners.
    #[cfg(unix)]
    pub(crate) fn install() -> io::Result<Self> {
        use signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    #[cfg(not(unix))]
    pub(crate) const fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Waits for the first signal and returns its name.
    #[cfg(unix)]
    pub(crate) async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.quit.recv() => "SIGQUIT",
        }
    }

    #[cfg(not(unix))]
    pub(crate) async fn recv(self) -> &'static str {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Error while waiting for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}
