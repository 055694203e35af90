//! Server configuration

use clap::Parser;
use std::path::PathBuf;

/// meshdrop server configuration
#[derive(Parser, Clone, Debug)]
#[command(name = "meshdrop")]
#[command(about = "Drop an image, get a 3D mesh")]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, default_value = "7878")]
    pub port: u16,

    /// Directory with the static frontend (index.html, app.js, ...)
    #[arg(long, default_value = "web")]
    pub web_root: PathBuf,

    /// Interval between queue status polls, in milliseconds
    #[arg(long, default_value = "1000")]
    pub poll_interval_ms: u64,
}
