use clap::Parser;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "currency-gateway")]
#[command(about = "Caching proxy for a currency exchange rate API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Currency API endpoint
    #[arg(
        short,
        long,
        env = "CURRENCY_API_URL",
        default_value = "https://api.apilayer.com/currency_data/live"
    )]
    pub upstream_url: String,

    // Sent upstream in the `apikey` header
    #[arg(short, long, env = "CURRENCY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    // Upstream request timeout in seconds
    #[arg(long, env = "CURRENCY_API_TIMEOUT", default_value_t = 10)]
    pub upstream_timeout: u64,

    // How often expired cache entries are dropped, in seconds
    #[arg(long, env = "CACHE_SWEEP_INTERVAL", default_value_t = 300)]
    pub sweep_interval: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("invalid upstream URL {url:?}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

// Settings read once at startup, never changed afterwards
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub api_key: String,
    pub upstream_timeout: Duration,
    pub sweep_interval: Duration,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let api_key = args.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let url = Url::parse(&args.upstream_url).map_err(|e| ConfigError::InvalidUpstreamUrl {
            url: args.upstream_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUpstreamUrl {
                url: args.upstream_url,
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        if args.upstream_timeout == 0 {
            return Err(ConfigError::ZeroDuration { name: "upstream timeout" });
        }
        if args.sweep_interval == 0 {
            return Err(ConfigError::ZeroDuration { name: "sweep interval" });
        }

        Ok(Self {
            port: args.port,
            upstream_url: args.upstream_url,
            api_key,
            upstream_timeout: Duration::from_secs(args.upstream_timeout),
            sweep_interval: Duration::from_secs(args.sweep_interval),
        })
    }
}

impl Config {
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.upstream_timeout)
            .build()
    }
}
