//! API server lifecycle — binds the listening socket and runs the axum
//! server that serves `api_router()`.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Metadata for a running API server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub info: ServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start the API server on all interfaces at `port`.
pub async fn start_server(core: Arc<CoreState>, port: u16) -> Result<ApiServer, String> {
    start_server_on(core, SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).await
}

/// Start the API server on a specific address.
///
/// Port `0` lets the OS choose; the bound port is reported in
/// [`ServerInfo::port`].
pub async fn start_server_on(core: Arc<CoreState>, addr: SocketAddr) -> Result<ApiServer, String> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    // 2. Build the router
    let app = api_router(core);

    let info = ServerInfo {
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    // 3. Shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 4. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        info,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Classifier, MockClassifier};

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn loaded_core() -> Arc<CoreState> {
        let classifier: Arc<dyn Classifier> = Arc::new(MockClassifier::default());
        Arc::new(CoreState::new(Some(classifier)))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server_on(loaded_core(), localhost())
            .await
            .expect("server should start");

        assert!(server.info.port > 0);

        let url = format!("http://127.0.0.1:{}/health", server.info.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn unloaded_model_is_visible_over_http() {
        let mut server = start_server_on(Arc::new(CoreState::new(None)), localhost())
            .await
            .expect("server should start");

        let url = format!("http://127.0.0.1:{}/health", server.info.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn server_info_has_valid_metadata() {
        let mut server = start_server_on(loaded_core(), localhost())
            .await
            .expect("server should start");

        assert!(!server.info.started_at.is_empty());
        assert!(server.info.server_addr.contains(':'));

        server.shutdown();
    }

    #[tokio::test]
    async fn binding_taken_port_fails() {
        let mut first = start_server_on(loaded_core(), localhost())
            .await
            .expect("server should start");
        let taken = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), first.info.port);

        let second = start_server_on(loaded_core(), taken).await;
        assert!(second.is_err());

        first.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server_on(loaded_core(), localhost())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}
