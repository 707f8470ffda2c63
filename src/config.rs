//! # Application Configuration Module
//!
//! This module defines the runtime configuration, loaded from environment
//! variables (a `.env` file is honored in development). Only the two LINE
//! channel credentials are required; everything else has a default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

// Constants for server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the webhook server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// LINE channel secret used to verify webhook signatures
    pub channel_secret: String,
    /// LINE channel access token used by the reply client
    pub channel_access_token: String,
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Directory holding the CSV data files
    pub data_dir: PathBuf,
    /// Geocoding API key; geocoding is disabled when absent
    pub geocoder_api_key: Option<String>,
    /// Geocoding endpoint URL
    pub geocoder_endpoint: String,
    /// Timeout applied to outbound HTTP calls (geocoder, reply API)
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_secret: String::new(),
            channel_access_token: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            geocoder_api_key: None,
            geocoder_endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS), // 10 seconds
        }
    }
}

impl AppConfig {
    /// Loads the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let channel_secret =
            env::var("LINE_CHANNEL_SECRET").context("LINE_CHANNEL_SECRET must be set")?;
        let channel_access_token = env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .context("LINE_CHANNEL_ACCESS_TOKEN must be set")?;

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT must be a number, got {value:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let geocoder_api_key = env::var("GEOCODER_API_KEY").ok().filter(|k| !k.is_empty());
        let geocoder_endpoint = env::var("GEOCODER_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_ENDPOINT.to_string());

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(
                value
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number, got {value:?}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            channel_secret,
            channel_access_token,
            host,
            port,
            data_dir,
            geocoder_api_key,
            geocoder_endpoint,
            http_timeout,
        })
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.geocoder_api_key.is_none());
    }
}
