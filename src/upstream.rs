use serde_json::Value;
use thiserror::Error;

use crate::models::QueryParams;

pub const API_KEY_HEADER: &str = "apikey";

// Anything that keeps us from getting a JSON body out of the currency API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

// Client for the currency API.
// status codes aren't inspected, any JSON body (even "success": false) is Ok
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self, params: &QueryParams) -> Result<Value, UpstreamError> {
        let res = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(params.pairs())
            .send()
            .await?;

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
