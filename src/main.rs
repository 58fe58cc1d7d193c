use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use mdserve::config::{AppState, Cli, ServerConfig};
use mdserve::handlers;
use mdserve::logger::Logger;
use mdserve::ServeError;

#[tokio::main]
async fn main() -> Result<(), ServeError> {
    let cli = Cli::parse();
    let _ = Logger::init();

    let config = ServerConfig::from_cli(cli)?;
    log::info!(
        "Serving HTTP on {} port {}, root: {}",
        config.ip,
        config.port,
        config.root.display()
    );

    let addr = config.socket_addr()?;
    let state = AppState {
        config: Arc::new(config),
    };
    let app = handlers::router(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(ServeError::from)
}
