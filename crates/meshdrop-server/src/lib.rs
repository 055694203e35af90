pub mod config;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use server::run_server;
