pub mod api; // HTTP boundary: /health, /predict, /test, static frontend
pub mod config;
pub mod core_state; // Shared classifier handle
pub mod pipeline; // Decode → classify → aggregate

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber (`RUST_LOG`, else the default filter).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load the model, serve until Ctrl-C, then shut down gracefully.
pub async fn run() -> Result<(), String> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(core_state::CoreState::load(&config::model_path()));
    let mut server = api::start_server(core, config::listen_port()).await?;
    tracing::info!(addr = %server.info.server_addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))?;

    server.shutdown();
    server.stopped().await;
    Ok(())
}
