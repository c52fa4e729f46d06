use clap::Parser;
use poly_weather::cli::{Cli, Commands};
use poly_weather::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, falling back to the bundled defaults
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::bundled_default()?
        }
    };

    // Initialize telemetry
    poly_weather::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting scan loop");
            args.execute(config).await?;
        }
        Commands::Scan(args) => {
            tracing::info!("Starting single scan");
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Bot: interval={}s limit={}",
                config.bot.scan_interval_seconds, config.bot.scan_limit
            );
            println!(
                "  Polymarket: min_liquidity={} keywords={}",
                config.polymarket.min_liquidity,
                config.polymarket.weather_keywords.len()
            );
            println!("  Weather: lookahead={}h", config.weather.lookahead_hours);
            println!(
                "  Signal: min_edge_bps={} min_confidence={}",
                config.signal.min_edge_bps, config.signal.min_confidence
            );
            println!(
                "  Paper: enabled={} size=${} max_open={}",
                config.paper.enabled, config.paper.position_size_usd, config.paper.max_open_positions
            );
        }
    }

    Ok(())
}
