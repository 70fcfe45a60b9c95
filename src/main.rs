use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use currency_gateway::app;
use currency_gateway::cache::{CACHE_TTL_SECS, MemoryCache, cache_sweeper};
use currency_gateway::config::{Args, Config};
use currency_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::try_from(Args::parse())?;

    let cache = Arc::new(MemoryCache::new());
    let state = Arc::new(AppState::new(&config, config.http_client()?, cache.clone()));

    // expired entries are dropped in the background
    tokio::spawn(cache_sweeper(cache, config.sweep_interval));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(address = %addr, "gateway listening");
    info!(upstream = %config.upstream_url, "forwarding to currency API");
    info!(ttl_secs = CACHE_TTL_SECS, "cache TTL");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
