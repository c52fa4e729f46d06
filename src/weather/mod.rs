//! Weather data collaborators
//!
//! Geocoding and hourly forecast retrieval (Open-Meteo), plus the window
//! selector that picks the forecast samples relevant to a prediction target.

mod forecast;
mod geocode;
mod window;

pub use forecast::OpenMeteoForecast;
pub use geocode::OpenMeteoGeocoder;
pub use window::select_window;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A resolved place from the geocoding collaborator
#[derive(Debug, Clone)]
pub struct GeoPlace {
    pub latitude: f64,
    pub longitude: f64,
    /// Resolved display name
    pub name: String,
    pub country: String,
}

impl GeoPlace {
    /// "City, Country" label used in rationales
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Hourly forecast series from one fetch; parallel ordered sequences
#[derive(Debug, Clone, Default)]
pub struct ForecastSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Temperature at 2m, Celsius
    pub temperature_c: Vec<f64>,
    /// Precipitation probability, percent 0-100
    pub precip_probability_pct: Vec<f64>,
}

impl ForecastSeries {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() || self.temperature_c.is_empty()
    }
}

/// Trait for geocoding collaborators: free text to zero-or-one best match
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, location: &str) -> anyhow::Result<Option<GeoPlace>>;
}

/// Trait for forecast collaborators
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn hourly(&self, latitude: f64, longitude: f64) -> anyhow::Result<ForecastSeries>;
}
