//! CLI interface for poly-weather
//!
//! Provides subcommands for:
//! - `run`: scan on a fixed interval, printing one JSON report per scan
//! - `scan`: run one scan and exit
//! - `config`: show effective configuration

mod run;
mod scan;

pub use run::RunArgs;
pub use scan::ScanArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-weather")]
#[command(about = "Weather signal bot for Polymarket weather markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan on a fixed interval
    Run(RunArgs),
    /// Run one scan and exit
    Scan(ScanArgs),
    /// Show effective configuration
    Config,
}
