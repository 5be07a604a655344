use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use batell_ai::server::{AppState, create_router};
use batell_ai::{AiConfig, Orchestrator};

const DEFAULT_PORT: u16 = 8787;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AiConfig::from_env();
    tracing::info!(providers = config.providers.len(), "Assembled provider lineup");

    let state = AppState {
        ai: Arc::new(Orchestrator::new(&config)),
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("AI proxy running on http://{addr}");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
