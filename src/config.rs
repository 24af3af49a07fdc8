//! Centralized configuration management for secdl

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Identity;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for downloaded documents
    pub download_dir: PathBuf,
    /// Organization name sent in the identifying header
    pub company_name: Option<String>,
    /// Contact email sent in the identifying header
    pub email: Option<String>,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Minimum delay between EDGAR requests (milliseconds)
    pub request_delay_ms: u64,
    /// Retries for rate-limited or dropped requests
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            request_delay_ms: 100,
            max_retries: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let download_dir = std::env::var("SECDL_DOWNLOAD_DIR")
            .unwrap_or_else(|_| "./downloads".to_string())
            .into();

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout_seconds: parse_env_var("SECDL_HTTP_TIMEOUT_SECONDS")?.unwrap_or(defaults.timeout_seconds),
            request_delay_ms: parse_env_var("SECDL_REQUEST_DELAY_MS")?.unwrap_or(defaults.request_delay_ms),
            max_retries: parse_env_var("SECDL_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
        };

        Ok(Config {
            download_dir,
            company_name: std::env::var("SECDL_COMPANY_NAME").ok(),
            email: std::env::var("SECDL_EMAIL").ok(),
            http,
        })
    }

    /// Replace identity fields with values given on the command line
    pub fn with_identity(mut self, company_name: Option<String>, email: Option<String>) -> Self {
        if company_name.is_some() {
            self.company_name = company_name;
        }
        if email.is_some() {
            self.email = email;
        }
        self
    }

    /// Build the identity EDGAR requires on every request
    pub fn identity(&self) -> Result<Identity> {
        let company_name = self.company_name.as_deref().unwrap_or_default();
        let email = self.email.as_deref().unwrap_or_default();
        Identity::new(company_name, email)
            .context("Set SECDL_COMPANY_NAME and SECDL_EMAIL (or pass --company-name and --email)")
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get delay between requests as Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.http.request_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            anyhow::bail!("SECDL_HTTP_TIMEOUT_SECONDS must be greater than zero");
        }

        std::fs::create_dir_all(&self.download_dir)
            .with_context(|| format!("Cannot create download directory: {}", self.download_dir.display()))?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            download_dir: "./downloads".into(),
            company_name: None,
            email: None,
            http: HttpConfig::default(),
        }
    }

    #[test]
    fn test_http_defaults() {
        let config = config();
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_delay(), Duration::from_millis(100));
        assert_eq!(config.http.max_retries, 3);
    }

    #[test]
    fn test_identity_override() {
        let config = Config {
            company_name: Some("Env Corp".to_string()),
            ..config()
        };
        let config = config.with_identity(None, Some("cli@example.com".to_string()));
        let identity = config.identity().unwrap();
        assert_eq!(identity.user_agent(), "Env Corp cli@example.com");
    }

    #[test]
    fn test_identity_missing() {
        assert!(config().identity().is_err());
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            download_dir: dir.path().join("nested"),
            ..config()
        };
        config.validate().unwrap();
        assert!(config.download_dir.exists());
    }
}
