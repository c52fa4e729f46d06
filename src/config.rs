//! Configuration types for poly-weather

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub polymarket: PolymarketConfig,
    pub weather: WeatherConfig,
    pub signal: SignalConfig,
    pub paper: PaperConfig,
    pub telemetry: TelemetryConfig,
}

/// Scan-loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Seconds between scans in `run` mode
    #[serde(default = "default_scan_interval")]
    pub scan_interval_seconds: u64,

    /// Maximum number of markets requested per scan
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// HTTP request timeout for all collaborators
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_scan_interval() -> u64 {
    300
}
fn default_scan_limit() -> usize {
    75
}
fn default_request_timeout() -> u64 {
    12
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            scan_interval_seconds: 300,
            scan_limit: 75,
            request_timeout_seconds: 12,
        }
    }
}

/// Market discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketConfig {
    pub gamma_url: String,
    pub min_liquidity: f64,
    pub weather_keywords: Vec<String>,
}

/// Forecast source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub geocode_url: String,
    pub forecast_url: String,
    /// Fallback horizon when no explicit date is parsed from the question
    pub lookahead_hours: i64,
}

/// Signal thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    pub min_edge_bps: i64,
    pub min_confidence: f64,
}

/// Paper trading configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    pub enabled: bool,
    pub state_path: PathBuf,
    pub starting_cash_usd: f64,
    pub position_size_usd: f64,
    pub max_open_positions: usize,
    /// A position closes once its side's edge has decayed past this threshold
    pub close_edge_bps: i64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Environment variables recognized as config overrides
const ENV_OVERRIDES: &[&str] = &[
    "BOT_SCAN_INTERVAL_SECONDS",
    "BOT_SCAN_LIMIT",
    "BOT_REQUEST_TIMEOUT_SECONDS",
    "POLYMARKET_GAMMA_URL",
    "POLYMARKET_MIN_LIQUIDITY",
    "POLYMARKET_WEATHER_KEYWORDS",
    "WEATHER_GEOCODE_URL",
    "WEATHER_FORECAST_URL",
    "WEATHER_LOOKAHEAD_HOURS",
    "SIGNAL_MIN_EDGE_BPS",
    "SIGNAL_MIN_CONFIDENCE",
];

impl Config {
    /// Load configuration from a TOML file and apply environment overrides
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the bundled example config (used when no config file is present)
    pub fn bundled_default() -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(include_str!("../config.toml.example"))?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ENV_OVERRIDES` on top of the file-loaded values
    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        for &key in ENV_OVERRIDES {
            let raw = match std::env::var(key) {
                Ok(v) => v,
                Err(_) => continue,
            };
            self.apply_override(key, &raw)
                .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", key, e))?;
        }
        Ok(())
    }

    fn apply_override(&mut self, key: &str, raw: &str) -> anyhow::Result<()> {
        match key {
            "BOT_SCAN_INTERVAL_SECONDS" => self.bot.scan_interval_seconds = raw.parse()?,
            "BOT_SCAN_LIMIT" => self.bot.scan_limit = raw.parse()?,
            "BOT_REQUEST_TIMEOUT_SECONDS" => self.bot.request_timeout_seconds = raw.parse()?,
            "POLYMARKET_GAMMA_URL" => self.polymarket.gamma_url = raw.to_string(),
            "POLYMARKET_MIN_LIQUIDITY" => self.polymarket.min_liquidity = raw.parse()?,
            "POLYMARKET_WEATHER_KEYWORDS" => {
                self.polymarket.weather_keywords = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "WEATHER_GEOCODE_URL" => self.weather.geocode_url = raw.to_string(),
            "WEATHER_FORECAST_URL" => self.weather.forecast_url = raw.to_string(),
            "WEATHER_LOOKAHEAD_HOURS" => self.weather.lookahead_hours = raw.parse()?,
            "SIGNAL_MIN_EDGE_BPS" => self.signal.min_edge_bps = raw.parse()?,
            "SIGNAL_MIN_CONFIDENCE" => self.signal.min_confidence = raw.parse()?,
            _ => {}
        }
        Ok(())
    }

    /// Reject configurations that would make the pipeline meaningless
    fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.signal.min_confidence) {
            anyhow::bail!(
                "signal.min_confidence must be in [0, 1], got {}",
                self.signal.min_confidence
            );
        }
        if self.weather.lookahead_hours <= 0 {
            anyhow::bail!(
                "weather.lookahead_hours must be positive, got {}",
                self.weather.lookahead_hours
            );
        }
        if self.paper.position_size_usd <= 0.0 {
            anyhow::bail!(
                "paper.position_size_usd must be positive, got {}",
                self.paper.position_size_usd
            );
        }
        if self.paper.starting_cash_usd < 0.0 {
            anyhow::bail!("paper.starting_cash_usd must be non-negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
            [bot]
            scan_interval_seconds = 300
            scan_limit = 75
            request_timeout_seconds = 12

            [polymarket]
            gamma_url = "https://gamma-api.polymarket.com/markets"
            min_liquidity = 1000.0
            weather_keywords = ["weather", "temperature", "rain", "snow"]

            [weather]
            geocode_url = "https://geocoding-api.open-meteo.com/v1/search"
            forecast_url = "https://api.open-meteo.com/v1/forecast"
            lookahead_hours = 72

            [signal]
            min_edge_bps = 300
            min_confidence = 0.55

            [paper]
            enabled = false
            state_path = "data/paper_state.json"
            starting_cash_usd = 1000.0
            position_size_usd = 50.0
            max_open_positions = 10
            close_edge_bps = 100

            [telemetry]
            log_level = "info"
        "#
    }

    #[test]
    fn test_config_deserialize() {
        let config: Config = toml::from_str(sample_toml()).unwrap();
        assert_eq!(config.bot.scan_limit, 75);
        assert_eq!(config.polymarket.min_liquidity, 1000.0);
        assert_eq!(config.signal.min_edge_bps, 300);
        assert_eq!(config.paper.max_open_positions, 10);
        assert!(!config.paper.enabled);
    }

    #[test]
    fn test_bot_defaults() {
        let toml = r#"
            [bot]

            [polymarket]
            gamma_url = "u"
            min_liquidity = 0.0
            weather_keywords = []

            [weather]
            geocode_url = "g"
            forecast_url = "f"
            lookahead_hours = 72

            [signal]
            min_edge_bps = 300
            min_confidence = 0.55

            [paper]
            enabled = false
            state_path = "s.json"
            starting_cash_usd = 1000.0
            position_size_usd = 50.0
            max_open_positions = 10
            close_edge_bps = 100

            [telemetry]
            log_level = "info"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bot.scan_interval_seconds, 300);
        assert_eq!(config.bot.request_timeout_seconds, 12);
    }

    #[test]
    fn test_validate_rejects_bad_confidence() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.signal.min_confidence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_position_size() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.paper.position_size_usd = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_keyword_override_parsing() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config
            .apply_override("POLYMARKET_WEATHER_KEYWORDS", "rain, snow ,, hail")
            .unwrap();
        assert_eq!(config.polymarket.weather_keywords, vec!["rain", "snow", "hail"]);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
