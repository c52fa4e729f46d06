//! Open-Meteo geocoding client

use super::{GeoPlace, Geocoder};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Client for the Open-Meteo geocoding API
pub struct OpenMeteoGeocoder {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, location: &str) -> anyhow::Result<Option<GeoPlace>> {
        tracing::debug!(location, "Geocoding location candidate");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", location),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: GeocodeResponse = response.json().await?;
        Ok(payload.results.into_iter().next().map(|r| GeoPlace {
            latitude: r.latitude,
            longitude: r.longitude,
            name: r.name,
            country: r.country,
        }))
    }
}
