//! API server implementation

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::routes::router;
use crate::state::{AppState, DEFAULT_PAGE_SIZE};

/// Listener settings (`[server]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Records per listing page.
    pub page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ServerSettings {
    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Feriae API server
pub struct Server {
    settings: ServerSettings,
    state: AppState,
}

impl Server {
    /// Create a new server instance
    pub fn new(settings: ServerSettings, state: AppState) -> Self {
        let state = state.with_page_size(settings.page_size);
        Self { settings, state }
    }

    /// Router with request tracing.
    pub fn app(&self) -> axum::Router {
        router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.settings.addr();
        let listener = TcpListener::bind(&addr).await.map_err(|source| Error::Serve {
            addr: addr.clone(),
            source,
        })?;
        let local = listener.local_addr().map_or(addr.clone(), |a| a.to_string());

        tracing::info!(
            address = %local,
            records = self.state.store().len(),
            backend = ?self.state.gateway(),
            "feriae api listening"
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| Error::Serve { addr, source })?;

        tracing::info!("feriae api stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
