use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::debug;

use crate::metrics::CACHE_SIZE;
use crate::models::QueryParams;

pub const CACHE_KEY_PREFIX: &str = "route:/api/currency:";

// Cached upstream bodies live for 24 hours
pub const CACHE_TTL_SECS: i64 = 86_400;

pub fn cache_ttl() -> TimeDelta {
    TimeDelta::seconds(CACHE_TTL_SECS)
}

// Cache key: names sorted, comma-lists inside each value sorted.
// "currencies=GBP,EUR&source=USD" and "source=USD&currencies=EUR,GBP" share a key.
pub fn make_cache_key(params: &QueryParams) -> String {
    let mut sorted: Vec<&(String, String)> = params.pairs().iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut key = String::from(CACHE_KEY_PREFIX);
    for (name, value) in sorted {
        let mut parts: Vec<&str> = value.split(',').collect();
        parts.sort_unstable();
        key.push_str(name);
        key.push('=');
        key.push_str(&parts.join(","));
        key.push(':');
    }
    key
}

// Cache entry with absolute expiry
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// Key-value store behind the gateway.
// a store that can't answer returns None, which callers treat as a miss
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value, expires_at: DateTime<Utc>);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// In-memory store, safe to share between request tasks
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(now) {
            // drop the read guard before touching the shard again
            drop(entry);
            self.entries.remove_if(key, |_, e| e.is_expired(now));
            return None;
        }
        Some(entry.value.clone())
    }

    // Returns how many entries were dropped
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, value: Value, expires_at: DateTime<Utc>) {
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// Drops expired entries periodically. Reads already skip them, this only frees memory.
pub async fn cache_sweeper(cache: Arc<MemoryCache>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    debug!(interval = ?sweep_interval, "cache sweeper started");

    loop {
        interval.tick().await;

        let purged = cache.purge_expired(Utc::now());
        CACHE_SIZE.set(cache.len() as f64);
        if purged > 0 {
            debug!(purged, remaining = cache.len(), "purged expired cache entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn key_ignores_parameter_and_list_order() {
        let a = params(&[("source", "USD"), ("currencies", "GBP,EUR")]);
        let b = params(&[("currencies", "EUR,GBP"), ("source", "USD")]);

        assert_eq!(make_cache_key(&a), "route:/api/currency:currencies=EUR,GBP:source=USD:");
        assert_eq!(make_cache_key(&a), make_cache_key(&b));
    }

    #[test]
    fn empty_params_give_prefix_only() {
        assert_eq!(make_cache_key(&QueryParams::default()), CACHE_KEY_PREFIX);
    }

    #[test]
    fn empty_value_keeps_empty_fragment() {
        let key = make_cache_key(&params(&[("source", ""), ("amount", "10")]));
        assert_eq!(key, "route:/api/currency:amount=10:source=:");
    }

    #[test]
    fn different_values_differ() {
        let usd = make_cache_key(&params(&[("source", "USD")]));
        let eur = make_cache_key(&params(&[("source", "EUR")]));
        assert_ne!(usd, eur);
    }

    #[test]
    fn separators_in_values_are_not_escaped() {
        // known collision: the key format leaves ':' and '=' in values as-is
        let joined = make_cache_key(&params(&[("a", "1:b=2")]));
        let split = make_cache_key(&params(&[("a", "1"), ("b", "2")]));
        assert_eq!(joined, "route:/api/currency:a=1:b=2:");
        assert_eq!(joined, split);
    }

    #[test]
    fn entry_is_served_until_expiry() {
        let cache = MemoryCache::new();
        let written = Utc::now();
        cache.set("k", json!({"success": true}), written + cache_ttl());

        assert_eq!(cache.get_at("k", written), Some(json!({"success": true})));
        assert_eq!(
            cache.get_at("k", written + TimeDelta::seconds(CACHE_TTL_SECS - 1)),
            Some(json!({"success": true}))
        );
        assert_eq!(cache.get_at("k", written + cache_ttl()), None);
        // expired lookups evict the entry
        assert!(cache.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + cache_ttl();
        cache.set("k", json!(1), expires);
        cache.set("k", json!(2), expires);

        assert_eq!(cache.get("k"), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn purge_drops_only_expired() {
        let cache = MemoryCache::new();
        let now = Utc::now();
        cache.set("old", json!("old"), now - TimeDelta::seconds(1));
        cache.set("fresh", json!("fresh"), now + cache_ttl());

        assert_eq!(cache.purge_expired(now), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(json!("fresh")));
    }
}
