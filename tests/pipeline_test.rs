//! End-to-end scan pipeline tests with mock collaborators

use async_trait::async_trait;
use chrono::{Duration, Utc};
use poly_weather::config::Config;
use poly_weather::engine::ScanEngine;
use poly_weather::market::MarketSource;
use poly_weather::signal::Action;
use poly_weather::weather::{ForecastProvider, ForecastSeries, GeoPlace, Geocoder};
use serde_json::{json, Value};
use std::sync::Arc;

fn test_config(state_path: &std::path::Path, paper_enabled: bool) -> Config {
    let toml = format!(
        r#"
        [bot]
        scan_interval_seconds = 300
        scan_limit = 75
        request_timeout_seconds = 12

        [polymarket]
        gamma_url = "http://unused"
        min_liquidity = 100.0
        weather_keywords = ["weather", "temperature", "rain", "snow"]

        [weather]
        geocode_url = "http://unused"
        forecast_url = "http://unused"
        lookahead_hours = 72

        [signal]
        min_edge_bps = 300
        min_confidence = 0.55

        [paper]
        enabled = {}
        state_path = "{}"
        starting_cash_usd = 1000.0
        position_size_usd = 50.0
        max_open_positions = 10
        close_edge_bps = 100

        [telemetry]
        log_level = "info"
        "#,
        paper_enabled,
        state_path.display()
    );
    toml::from_str(&toml).unwrap()
}

struct StaticMarkets(Vec<Value>);

#[async_trait]
impl MarketSource for StaticMarkets {
    async fn fetch_markets(&self, _limit: usize) -> anyhow::Result<Vec<Value>> {
        Ok(self.0.clone())
    }
}

struct FailingMarkets;

#[async_trait]
impl MarketSource for FailingMarkets {
    async fn fetch_markets(&self, _limit: usize) -> anyhow::Result<Vec<Value>> {
        anyhow::bail!("gamma down")
    }
}

struct StaticGeocoder;

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn resolve(&self, location: &str) -> anyhow::Result<Option<GeoPlace>> {
        // Only recognizable city names resolve.
        let known = ["Miami", "Seattle", "Denver"];
        Ok(known.iter().any(|k| location.contains(k)).then(|| GeoPlace {
            latitude: 25.77,
            longitude: -80.19,
            name: location.to_string(),
            country: "United States".into(),
        }))
    }
}

struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn resolve(&self, _location: &str) -> anyhow::Result<Option<GeoPlace>> {
        anyhow::bail!("geocoder down")
    }
}

/// Constant hourly forecast, starting now, 96 hours
struct FlatForecast {
    temp_c: f64,
    precip_pct: f64,
}

#[async_trait]
impl ForecastProvider for FlatForecast {
    async fn hourly(&self, _latitude: f64, _longitude: f64) -> anyhow::Result<ForecastSeries> {
        let start = Utc::now();
        Ok(ForecastSeries {
            timestamps: (0..96).map(|i| start + Duration::hours(i)).collect(),
            temperature_c: vec![self.temp_c; 96],
            precip_probability_pct: vec![self.precip_pct; 96],
        })
    }
}

fn rain_market(id: &str, yes_price: f64) -> Value {
    json!({
        "id": id,
        "question": "Will it rain in Seattle tomorrow?",
        "yesPrice": yes_price,
        "liquidity": 2000.0,
    })
}

fn engine(
    markets: Vec<Value>,
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastProvider>,
    config: Config,
) -> ScanEngine {
    ScanEngine::with_collaborators(config, Arc::new(StaticMarkets(markets)), geocoder, forecast)
}

#[tokio::test]
async fn test_scan_emits_buy_yes_on_wet_forecast() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("state.json"), false);
    // Cheap YES price, near-certain rain: large positive edge.
    let engine = engine(
        vec![rain_market("m1", 0.20)],
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config,
    );

    let report = engine.run_scan(false).await.unwrap();
    assert_eq!(report.scanned_count, 1);
    assert_eq!(report.alerts_count, 1);
    assert_eq!(report.alerts[0].action, Action::BuyYes);
    assert!(report.alerts[0].edge_bps >= 300);
    assert_eq!(report.evaluations.len(), 1);
    assert!(report.paper.is_none());
}

#[tokio::test]
async fn test_scan_counts_no_signal_markets_as_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("state.json"), false);
    // Market already prices the rain correctly: no edge.
    let engine = engine(
        vec![rain_market("m1", 0.93)],
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config,
    );

    let report = engine.run_scan(false).await.unwrap();
    assert_eq!(report.alerts_count, 0);
    assert_eq!(report.skipped_count, 1);
    // The evaluation audit row is still produced.
    assert_eq!(report.evaluations.len(), 1);
}

#[tokio::test]
async fn test_geocoder_failure_skips_market_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("state.json"), false);
    let engine = engine(
        vec![rain_market("m1", 0.20), rain_market("m2", 0.20)],
        Arc::new(FailingGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config,
    );

    let report = engine.run_scan(false).await.unwrap();
    assert_eq!(report.scanned_count, 2);
    assert_eq!(report.skipped_count, 2);
    assert_eq!(report.alerts_count, 0);
    assert!(report.evaluations.is_empty());
}

#[tokio::test]
async fn test_unresolvable_location_yields_neutral_audit_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("state.json"), false);
    let market = json!({
        "id": "m1",
        "question": "Will it rain in Zzyzxville tomorrow?",
        "yesPrice": 0.20,
        "liquidity": 2000.0,
    });
    let engine = engine(
        vec![market],
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config,
    );

    let report = engine.run_scan(false).await.unwrap();
    // Neutral 0.5 at confidence 0.15: no signal, but the row is audited.
    assert_eq!(report.alerts_count, 0);
    assert_eq!(report.evaluations[0].model_yes_prob, 0.5);
    assert_eq!(report.evaluations[0].confidence, 0.15);
    assert!(report.evaluations[0].signal_action.is_none());
}

#[tokio::test]
async fn test_market_list_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("state.json"), false);
    let engine = ScanEngine::with_collaborators(
        config,
        Arc::new(FailingMarkets),
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 0.0 }),
    );
    assert!(engine.run_scan(false).await.is_err());
}

#[tokio::test]
async fn test_paper_trading_persists_across_scans() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let config = test_config(&state_path, true);
    let engine = engine(
        vec![rain_market("m1", 0.20)],
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config.clone(),
    );

    let first = engine.run_scan(false).await.unwrap();
    let paper = first.paper.expect("paper summary");
    assert_eq!(paper.opened.len(), 1);
    assert_eq!(paper.cash_usd, 950.0);
    assert!((paper.equity_usd - (paper.cash_usd + paper.position_value_usd)).abs() < 0.011);
    assert!(state_path.exists());

    // Second scan with unchanged data: same-side signal, no stacking.
    let second = engine.run_scan(false).await.unwrap();
    let paper = second.paper.expect("paper summary");
    assert!(paper.opened.is_empty());
    assert_eq!(paper.open_positions, 1);
    assert_eq!(paper.cash_usd, 950.0);
}

#[tokio::test]
async fn test_malformed_state_file_disables_paper_without_reset() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    std::fs::write(&state_path, "{broken").unwrap();
    let config = test_config(&state_path, true);
    let engine = engine(
        vec![rain_market("m1", 0.20)],
        Arc::new(StaticGeocoder),
        Arc::new(FlatForecast { temp_c: 15.0, precip_pct: 90.0 }),
        config,
    );

    let report = engine.run_scan(false).await.unwrap();
    assert!(report.paper.is_none());
    // The corrupt file is preserved for inspection.
    assert_eq!(std::fs::read_to_string(&state_path).unwrap(), "{broken");
}
