//! Geocoding collaborator: resolves a typed address to coordinates.
//!
//! Resolution is best-effort enrichment. `Ok(None)` means the address did
//! not resolve; `Err` is reserved for transport-level failures. The router
//! swallows both and lets the booking continue without coordinates.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Address resolved to a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

/// Geocoding port
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Option<ResolvedLocation>>;
}

/// Used when no geocoding endpoint is configured; resolves nothing
#[derive(Default)]
pub struct NoopGeocoder;

impl NoopGeocoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Geocoder for NoopGeocoder {
    async fn resolve(&self, _address: &str) -> Result<Option<ResolvedLocation>> {
        Ok(None)
    }
}

// Google-geocoding response shape, reduced to the consumed fields

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// HTTP geocoder speaking the Google Geocoding API shape
pub struct HttpGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build geocoder HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<ResolvedLocation>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("address", address),
                ("key", self.api_key.as_str()),
                ("language", "th"),
            ])
            .send()
            .await
            .context("Geocoding request failed")?;

        let body: GeocodeResponse = response
            .json()
            .await
            .context("Geocoding response was not valid JSON")?;

        if body.status != "OK" {
            debug!(status = %body.status, "Geocoder returned no result");
            return Ok(None);
        }

        match body.results.into_iter().next() {
            Some(first) => Ok(Some(ResolvedLocation {
                lat: first.geometry.location.lat,
                lng: first.geometry.location.lng,
                formatted_address: first.formatted_address,
            })),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parsing() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "123 ถนนสุขุมวิท แขวงคลองเตย กรุงเทพมหานคร 10110",
                "geometry": { "location": { "lat": 13.7563, "lng": 100.5018 } }
            }]
        }"#;

        let parsed: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results[0].geometry.location.lat, 13.7563);
    }

    #[test]
    fn test_zero_results_parsing() {
        let json = r#"{ "status": "ZERO_RESULTS" }"#;

        let parsed: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn test_noop_geocoder_resolves_nothing() {
        let geocoder = NoopGeocoder::new();
        let result = geocoder.resolve("99/1 ถนนสุขุมวิท").await.unwrap();
        assert!(result.is_none());
    }
}
