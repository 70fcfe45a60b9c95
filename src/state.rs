use chrono::TimeDelta;
use std::sync::Arc;

use crate::cache::{CacheStore, cache_ttl};
use crate::config::Config;
use crate::upstream::UpstreamClient;

// app's shared state
pub struct AppState {
    pub upstream: UpstreamClient,
    pub cache: Arc<dyn CacheStore>,
    pub ttl: TimeDelta, // how long a cached body stays valid
}

impl AppState {
    pub fn new(config: &Config, client: reqwest::Client, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            upstream: UpstreamClient::new(client, config.upstream_url.clone(), config.api_key.clone()),
            cache,
            ttl: cache_ttl(),
        }
    }
}
