use anyhow::{Context, Result};
use clap::Parser;
use meshdrop_core::FalClient;
use meshdrop_server::{run_server, ServerConfig};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();

    let api_key = std::env::var("FAL_KEY")
        .context("FAL_KEY environment variable must be set (fal.ai API key)")?;

    let generator = Arc::new(
        FalClient::new(api_key)
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms)),
    );

    run_server(config, generator).await
}
