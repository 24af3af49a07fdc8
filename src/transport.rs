//! HTTP collaborator: identified, rate-limited GET requests against EDGAR

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::TransportError;
use crate::models::Identity;

/// Fetches JSON documents and raw bytes. Every call carries the caller's
/// identity, which implementations must send as the `User-Agent`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, url: &str, identity: &Identity) -> Result<serde_json::Value, TransportError>;

    async fn fetch_bytes(&self, url: &str, identity: &Identity) -> Result<Vec<u8>, TransportError>;
}

/// Minimum spacing between consecutive requests
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// `reqwest`-backed transport honouring EDGAR's fair-access policy.
pub struct HttpTransport {
    client: Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration, min_interval: Duration, max_retries: u32) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            max_retries,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Base back-off between retries; attempt `n` waits `n` times this.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(config.http_timeout(), config.request_delay(), config.http.max_retries)
    }

    async fn get(&self, url: &str, identity: &Identity, accept: &'static str) -> Result<reqwest::Response, TransportError> {
        let user_agent = HeaderValue::from_str(&identity.user_agent())
            .map_err(|_| TransportError::MissingIdentity(url.to_string()))?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            self.rate_limiter.lock().await.wait().await;
            debug!("GET {} (attempt {})", url, attempt);

            let result = self
                .client
                .get(url)
                .header(USER_AGENT, user_agent.clone())
                .header(ACCEPT, accept)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response)
                    if response.status() == StatusCode::TOO_MANY_REQUESTS && attempt <= self.max_retries =>
                {
                    warn!("Rate limited on {}, waiting before retry...", url);
                    sleep(self.retry_delay * attempt).await;
                }
                Ok(response) => {
                    return Err(TransportError::Status {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    })
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt <= self.max_retries => {
                    warn!("Request failed for {} (attempt {}): {}", url, attempt, e);
                    sleep(self.retry_delay * attempt).await;
                }
                Err(e) => return Err(TransportError::Http(e)),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, url: &str, identity: &Identity) -> Result<serde_json::Value, TransportError> {
        let body = self.get(url, identity, "application/json").await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_bytes(&self, url: &str, identity: &Identity) -> Result<Vec<u8>, TransportError> {
        let body = self
            .get(url, identity, "text/html,text/plain,*/*")
            .await?
            .bytes()
            .await?;
        Ok(body.to_vec())
    }
}
