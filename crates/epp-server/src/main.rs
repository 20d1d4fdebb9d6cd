//! Enhanced preprints server binary

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use epp_server::{serve, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;
    let repository = config.repository.open()?;
    let state = Arc::new(AppState::new(repository));

    serve(&config.addr, state).await
}
