//! HTTP client for authenticated upstream API calls.
//!
//! Provides a wrapper around reqwest with:
//! - Bearer authentication and JSON accept headers on every request
//! - A per-request timeout
//! - Upstream status and decode failures mapped onto [`AsnRadarError`]

use crate::config::NetworkConfig;
use crate::{AsnRadarError, Result};
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the upstream API.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| AsnRadarError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self { client, timeout })
    }

    /// Request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with a bearer token and decode the body as JSON.
    ///
    /// `source_name` labels errors so a failing endpoint is identifiable in
    /// logs (`"Speed data API error: 503"`).
    pub async fn get_json_authorized(
        &self,
        url: &str,
        token: &str,
        source_name: &str,
    ) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AsnRadarError::Timeout(self.timeout)
                } else {
                    AsnRadarError::Network {
                        message: format!("GET {} failed: {}", extract_domain(url), e),
                        source: Some(e),
                    }
                }
            })?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(AsnRadarError::UpstreamHttp {
                source_name: source_name.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AsnRadarError::Parse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
