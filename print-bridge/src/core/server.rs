//! HTTP listener
//!
//! Binds the loopback socket and serves the print API until Ctrl-C.
//! Each connection is handled on its own task; printing itself is
//! serialized by the dispatcher.

use tokio::net::TcpListener;

use crate::api;
use crate::core::{AppState, Result, ServerError};

pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run until a shutdown signal arrives
    pub async fn run(self) -> Result<()> {
        let config = self.state.config.clone();

        if config.self_test {
            let outcome = self.state.print_service.print_self_test().await;
            if outcome.success {
                tracing::info!(method = %outcome.method, "Self-test ticket printed");
            } else {
                tracing::warn!(
                    method = %outcome.method,
                    error = %outcome.message,
                    "Self-test print failed, serving anyway"
                );
            }
        }

        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        tracing::info!("print-bridge listening on http://{}", addr);

        let app = api::router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("print-bridge stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
