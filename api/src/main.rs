//! Subscan proxy server for the migration assistant

use anyhow::{anyhow, Result};
use api::{
    client::SubscanClient,
    config::ProxyConfig,
    routes::{router, ProxyState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,subscan_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    if config.api_key.is_none() {
        tracing::warn!("SUBSCAN_API_KEY is not set, upstream requests are unauthenticated");
    }

    let client = SubscanClient::new(&config)?;
    let app = router(ProxyState::new(client));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Subscan proxy listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
