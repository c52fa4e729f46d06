//! Scan engine
//!
//! Orchestrates one run: fetch markets, classify, then interpret / geocode /
//! forecast / model / evaluate each candidate independently. A failure in one
//! market's pipeline is recorded and never aborts the run; only the initial
//! market-list fetch is fatal (no candidates to evaluate).

use crate::config::Config;
use crate::interpret;
use crate::market::{GammaClient, MarketCandidate, MarketClassifier, MarketSource};
use crate::model::{self, ProbabilityEstimate};
use crate::paper::{LedgerSummary, PaperTradingLedger};
use crate::signal::{edge_bps, Action, Signal, SignalEvaluator};
use crate::weather::{
    ForecastProvider, GeoPlace, Geocoder, OpenMeteoForecast, OpenMeteoGeocoder,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-market pipeline failure; the run aggregator counts these
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("geocoding failed for '{location}': {source}")]
    Geocode {
        location: String,
        source: anyhow::Error,
    },
    #[error("forecast fetch failed for {label}: {source}")]
    Forecast {
        label: String,
        source: anyhow::Error,
    },
}

/// Audit row for one evaluated market
#[derive(Debug, Clone, Serialize)]
pub struct MarketEvaluation {
    pub market_id: String,
    pub question: String,
    pub liquidity: f64,
    pub market_yes_prob: f64,
    pub model_yes_prob: f64,
    pub confidence: f64,
    pub edge_bps: i64,
    pub signal_action: Option<Action>,
}

/// Structured result of one run
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub timestamp: DateTime<Utc>,
    pub scanned_count: usize,
    pub skipped_count: usize,
    pub alerts_count: usize,
    pub alerts: Vec<Signal>,
    pub evaluations: Vec<MarketEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper: Option<LedgerSummary>,
}

/// One-scan pipeline over pluggable collaborators
pub struct ScanEngine {
    config: Config,
    market_source: Arc<dyn MarketSource>,
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastProvider>,
    classifier: MarketClassifier,
    evaluator: SignalEvaluator,
}

impl ScanEngine {
    /// Build an engine with HTTP collaborators from the config
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.bot.request_timeout_seconds);
        let market_source = Arc::new(GammaClient::new(&config.polymarket.gamma_url, timeout)?);
        let geocoder = Arc::new(OpenMeteoGeocoder::new(&config.weather.geocode_url, timeout)?);
        let forecast = Arc::new(OpenMeteoForecast::new(&config.weather.forecast_url, timeout)?);
        Ok(Self::with_collaborators(
            config,
            market_source,
            geocoder,
            forecast,
        ))
    }

    /// Build an engine with explicit collaborators (tests inject mocks here)
    pub fn with_collaborators(
        config: Config,
        market_source: Arc<dyn MarketSource>,
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Self {
        let classifier = MarketClassifier::new(&config.polymarket);
        let evaluator = SignalEvaluator::new(&config.signal);
        Self {
            config,
            market_source,
            geocoder,
            forecast,
            classifier,
            evaluator,
        }
    }

    /// Run one scan over all candidates
    pub async fn run_scan(&self, force_paper: bool) -> anyhow::Result<ScanReport> {
        let now = Utc::now();
        let raw_markets = self
            .market_source
            .fetch_markets(self.config.bot.scan_limit)
            .await?;
        let candidates = self.classifier.classify(raw_markets);
        tracing::info!(candidate_count = candidates.len(), "Classified weather candidates");

        let mut alerts: Vec<Signal> = Vec::new();
        let mut evaluations: Vec<MarketEvaluation> = Vec::new();
        let mut skipped = 0usize;
        let scanned = candidates.len();

        for market in &candidates {
            match self.evaluate_market(market, now).await {
                Ok((evaluation, signal)) => {
                    evaluations.push(evaluation);
                    match signal {
                        Some(signal) => alerts.push(signal),
                        None => skipped += 1,
                    }
                }
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(
                        market_id = %market.id,
                        error = %err,
                        "Market skipped due to pipeline error"
                    );
                }
            }
        }

        metrics::counter!("polyweather_markets_scanned").increment(scanned as u64);
        metrics::counter!("polyweather_signals_emitted").increment(alerts.len() as u64);

        let paper = if self.config.paper.enabled || force_paper {
            self.apply_paper_trading(&evaluations, &alerts, now)
        } else {
            None
        };

        Ok(ScanReport {
            timestamp: now,
            scanned_count: scanned,
            skipped_count: skipped,
            alerts_count: alerts.len(),
            alerts,
            evaluations,
            paper,
        })
    }

    fn apply_paper_trading(
        &self,
        evaluations: &[MarketEvaluation],
        alerts: &[Signal],
        now: DateTime<Utc>,
    ) -> Option<LedgerSummary> {
        let ledger = PaperTradingLedger::new(self.config.paper.clone());
        match ledger.apply(evaluations, alerts, now) {
            Ok(summary) => {
                metrics::gauge!("polyweather_equity_usd").set(summary.equity_usd);
                metrics::gauge!("polyweather_open_positions").set(summary.open_positions as f64);
                Some(summary)
            }
            Err(err) => {
                // A malformed state file is left on disk for inspection.
                tracing::warn!(error = %err, "Paper trading skipped this run");
                None
            }
        }
    }

    /// Run the interpretation/estimation pipeline for one market
    async fn evaluate_market(
        &self,
        market: &MarketCandidate,
        now: DateTime<Utc>,
    ) -> Result<(MarketEvaluation, Option<Signal>), EvalError> {
        let target = interpret::interpret(&market.question, now.date_naive());
        let estimate = self.estimate_for_target(&target, now).await?;

        let signal = self.evaluator.evaluate(market, &estimate);
        let evaluation = MarketEvaluation {
            market_id: market.id.clone(),
            question: market.question.clone(),
            liquidity: (market.liquidity * 100.0).round() / 100.0,
            market_yes_prob: (market.yes_price * 10_000.0).round() / 10_000.0,
            model_yes_prob: (estimate.model_prob * 10_000.0).round() / 10_000.0,
            confidence: (estimate.confidence * 10_000.0).round() / 10_000.0,
            edge_bps: edge_bps(estimate.model_prob, market.yes_price),
            signal_action: signal.as_ref().map(|s| s.action),
        };
        Ok((evaluation, signal))
    }

    async fn estimate_for_target(
        &self,
        target: &interpret::PredictionTarget,
        now: DateTime<Utc>,
    ) -> Result<ProbabilityEstimate, EvalError> {
        let (place, parsed_city) = match self.resolve_location(&target.locations).await? {
            Some(resolved) => resolved,
            None => return Ok(ProbabilityEstimate::location_failure(self.location_failure_reason(target))),
        };

        let label = place.label();
        let series = self
            .forecast
            .hourly(place.latitude, place.longitude)
            .await
            .map_err(|source| EvalError::Forecast {
                label: label.clone(),
                source,
            })?;
        if series.is_empty() {
            return Ok(ProbabilityEstimate::missing_forecast(&label));
        }

        tracing::debug!(city = %parsed_city, label = %label, "Resolved market location");
        Ok(model::estimate(
            target,
            &series,
            &label,
            now,
            self.config.weather.lookahead_hours,
        ))
    }

    fn location_failure_reason(&self, target: &interpret::PredictionTarget) -> String {
        if target.locations.is_empty() {
            "Could not parse city from market question.".to_string()
        } else {
            format!(
                "Could not geocode parsed city candidates: {:?}",
                target.locations
            )
        }
    }

    /// Try location candidates in discovery order; first geocode hit wins
    async fn resolve_location(
        &self,
        candidates: &[String],
    ) -> Result<Option<(GeoPlace, String)>, EvalError> {
        for city in candidates {
            let place = self
                .geocoder
                .resolve(city)
                .await
                .map_err(|source| EvalError::Geocode {
                    location: city.clone(),
                    source,
                })?;
            if let Some(place) = place {
                return Ok(Some((place, city.clone())));
            }
        }
        Ok(None)
    }
}
