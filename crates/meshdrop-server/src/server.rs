//! Server startup

use crate::config::ServerConfig;
use crate::routes::{create_router, AppState};
use anyhow::Result;
use meshdrop_core::MeshGenerator;
use std::net::SocketAddr;
use std::sync::Arc;

/// Bind and serve until the process is stopped
pub async fn run_server(config: ServerConfig, generator: Arc<dyn MeshGenerator>) -> Result<()> {
    let state = Arc::new(AppState { generator });
    let app = create_router(state, &config.web_root);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        "Starting meshdrop server on http://{} (frontend from {:?})",
        addr,
        config.web_root
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
