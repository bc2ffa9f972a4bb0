// # dynup-ip-http
//
// HTTP-based public-IP detection for the dynup update client.
//
// Asks a "what is my IP" service for the plaintext address of this
// host. This is the collaborator the scheduler consults before each
// update round; a failed probe is recoverable and simply retried on the
// next tick.
//
// Several well-known services are probed in order so a single outage
// does not blind the client.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use dynup_core::{Error, IpDetector, Result};

/// Default IP check services, tried in order
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",  // returns plain text IP
    "https://ifconfig.me/ip", // no rate limit documented
    "https://icanhazip.com",  // no rate limit documented
];

/// Probe timeout per service
const DETECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public-IP detector
pub struct HttpIpDetector {
    urls: Vec<String>,
    client: reqwest::Client,
}

impl HttpIpDetector {
    /// Detector probing the default service list
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect())
    }

    /// Detector probing a single custom service
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Self::with_urls(vec![url.into()])
    }

    /// Detector probing `urls` in order until one answers
    pub fn with_urls(urls: Vec<String>) -> Result<Self> {
        if urls.is_empty() {
            return Err(Error::config("at least one IP service URL is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(DETECT_TIMEOUT)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self { urls, client })
    }

    /// Probe one service
    async fn fetch(&self, url: &str) -> Result<IpAddr> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::detection(format!("request to '{}' failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::detection(format!(
                "'{}' answered {}",
                url,
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::detection(format!("failed to read body from '{}': {}", url, e)))?;

        let trimmed = text.trim();
        trimmed.parse().map_err(|_| {
            Error::detection(format!("'{}' returned no IP address: {:?}", url, trimmed))
        })
    }
}

#[async_trait]
impl IpDetector for HttpIpDetector {
    async fn detect(&self) -> Result<IpAddr> {
        let mut last_err = None;
        for url in &self.urls {
            match self.fetch(url).await {
                Ok(ip) => {
                    tracing::debug!("detected public IP {} via '{}'", ip, url);
                    return Ok(ip);
                }
                Err(err) => {
                    tracing::warn!("IP service failed: {}", err);
                    last_err = Some(err);
                }
            }
        }

        // with_urls guarantees at least one probe ran
        Err(last_err.unwrap_or_else(|| Error::detection("no IP services configured")))
    }
}
