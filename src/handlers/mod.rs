mod health;
mod metrics;
mod currency;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use currency::currency_handler;
