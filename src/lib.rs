//! poly-weather: Weather signal bot for Polymarket weather markets
//!
//! This library provides the core components for:
//! - Market discovery and weather-relevance classification via Gamma API
//! - Question interpretation (location, date, temperature rule extraction)
//! - Geocoding and hourly forecast retrieval from Open-Meteo
//! - Probability modeling for temperature, precipitation and snow markets
//! - Edge-based signal generation
//! - Persistent paper-trading ledger
//! - Observability stack

pub mod cli;
pub mod config;
pub mod engine;
pub mod interpret;
pub mod market;
pub mod model;
pub mod paper;
pub mod signal;
pub mod telemetry;
pub mod weather;
