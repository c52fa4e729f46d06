//! Open-Meteo hourly forecast client

use super::{ForecastProvider, ForecastSeries};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Forecast days requested per fetch; covers any reasonable lookahead
const FORECAST_DAYS: u32 = 16;

/// Client for the Open-Meteo forecast API
pub struct OpenMeteoForecast {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: Hourly,
}

#[derive(Debug, Deserialize, Default)]
struct Hourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoForecast {
    async fn hourly(&self, latitude: f64, longitude: f64) -> anyhow::Result<ForecastSeries> {
        tracing::debug!(latitude, longitude, "Fetching hourly forecast");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "temperature_2m,precipitation_probability".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: ForecastResponse = response.json().await?;
        let hourly = payload.hourly;

        // Open-Meteo hourly times are naive ISO strings in the requested
        // timezone (UTC here); rows that fail to parse are dropped as a set.
        let mut series = ForecastSeries::default();
        for (idx, raw_ts) in hourly.time.iter().enumerate() {
            let ts = match NaiveDateTime::parse_from_str(raw_ts, "%Y-%m-%dT%H:%M") {
                Ok(ts) => ts.and_utc(),
                Err(_) => continue,
            };
            let temp = hourly.temperature_2m.get(idx).copied().flatten();
            let precip = hourly.precipitation_probability.get(idx).copied().flatten();
            if let Some(temp) = temp {
                series.timestamps.push(ts);
                series.temperature_c.push(temp);
                series.precip_probability_pct.push(precip.unwrap_or(0.0));
            }
        }
        Ok(series)
    }
}
