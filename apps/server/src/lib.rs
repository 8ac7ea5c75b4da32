//! # Clone Watch Server
//!
//! An `Axum` server that answers `/issue` with a deep-copy-then-filter view of
//! the user dataset and `/no-issue` with the same view computed straight from
//! the shared records, so their CPU and allocation costs can be compared.
//!
//! ## Example
//! ```no_run
//! use cwatch_server::Server;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

pub mod router;
mod shutdown;

use crate::shutdown::ShutdownSignal;
use anyhow::{Context, Result};
use axum_server::Handle;
use cwatch::domain::config::{ApiConfig, LoggingConfig};
use cwatch::domain::user::Dataset;
use cwatch::kernel::server::ApiState;
use cwatch_logger::{Logger, LoggerError};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Consumes the builder, generates the dataset and assembles the state.
    ///
    /// # Errors
    /// Returns an error if the application state cannot be finalized.
    pub fn build(self) -> Result<Server> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(
            address = %address,
            records = self.cfg.dataset.size,
            features = ?cwatch::features::ENABLED,
            "Initializing server"
        );

        let dataset = Dataset::generate(self.cfg.dataset.size);
        let state = ApiState::builder()
            .config(self.cfg)
            .dataset(dataset)
            .build()
            .context("Failed to finalize API state")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves requests until SIGINT, SIGTERM or SIGQUIT arrives, then drains
    /// open connections for at most `server.shutdown_timeout_secs`.
    ///
    /// # Errors
    /// Returns an error if the signal handlers cannot be installed or the
    /// listener fails to bind.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let grace = Duration::from_secs(cfg.server.shutdown_timeout_secs);

        let signal = ShutdownSignal::install().context("Failed to install signal handlers")?;
        let app = router::init(self.state);

        let handle = Handle::<SocketAddr>::new();

        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let name = signal.recv().await;
            info!(signal = name, "Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        let ready_handle = handle.clone();
        tokio::spawn(async move {
            if let Some(bound) = ready_handle.listening().await {
                info!("Server started on http://localhost:{}", bound.port());
            }
        });

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Installs the global subscriber described by the `[logging]` section.
///
/// Console output is always on; a `directory` adds rolling files, written as
/// JSON lines when `json` is set.
///
/// # Errors
/// Returns the [`LoggerError`] raised by [`cwatch_logger::LoggerBuilder::init`].
pub fn init_logger(cfg: &LoggingConfig) -> Result<Logger, LoggerError> {
    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME"));
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter);
    }

    match &cfg.directory {
        Some(directory) => builder.directory(directory).json(cfg.json).init(),
        None => builder.init(),
    }
}
