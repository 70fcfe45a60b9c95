use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("currency_requests_total", "Total number of currency requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("currency_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("currency_cache_misses_total", "Total cache misses").unwrap();
    pub static ref UPSTREAM_FAILURES: Counter = register_counter!(
        "currency_upstream_failures_total",
        "Requests where the currency API could not be reached"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "currency_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("currency_cache_size", "Current number of items in cache").unwrap();
}
