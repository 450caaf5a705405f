//! # Static Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, instala el logging y corre el servidor.

use static_server::config::Config;
use static_server::server::Server;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("static_server=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_thread_names(true))
        .with(filter)
        .init();

    let config = Config::new();
    tracing::info!("static_server v{}", env!("CARGO_PKG_VERSION"));
    config.print_summary();

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("fatal: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("fatal: {}", e);
        std::process::exit(1);
    }
}
