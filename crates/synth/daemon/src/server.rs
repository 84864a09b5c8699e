//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use std::sync::Arc;
use synth_engine::SynthesisEngine;
use synth_generator::StaticIndicators;
use synth_store::InMemorySynthesisStore;
use tokio::net::TcpListener;

/// Synth Daemon Server
pub struct Server {
    config: DaemonConfig,
    engine: Arc<SynthesisEngine>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let storage = Arc::new(InMemorySynthesisStore::new());
        let indicators = Arc::new(StaticIndicators::new(config.indicators));
        let engine = SynthesisEngine::new(config.engine.clone(), storage, indicators)?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }

    /// Engine served by this daemon
    pub fn engine(&self) -> Arc<SynthesisEngine> {
        self.engine.clone()
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.engine.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Synth daemon listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Synth daemon shutting down");

        // Last chance for feedback queued while the store was unavailable
        let report = self.engine.flush_feedback().await;
        if report.requeued > 0 || report.discarded > 0 {
            tracing::warn!(
                recorded = report.recorded,
                requeued = report.requeued,
                discarded = report.discarded,
                "Pending feedback left unrecorded at shutdown"
            );
        }

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
