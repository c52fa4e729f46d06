//! Run command implementation

use crate::config::Config;
use crate::engine::ScanEngine;
use clap::Args;
use std::time::Duration;

/// Interval floor so a misconfigured interval cannot hot-loop the APIs
const MIN_INTERVAL_SECS: u64 = 5;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run one scan and exit
    #[arg(long)]
    pub once: bool,

    /// Force the paper-trading ledger on, regardless of config
    #[arg(long)]
    pub paper: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let interval = Duration::from_secs(config.bot.scan_interval_seconds.max(MIN_INTERVAL_SECS));
        let run_once = self.once || env_run_once();
        let engine = ScanEngine::from_config(config)?;

        loop {
            let report = engine.run_scan(self.paper).await?;
            println!("{}", serde_json::to_string(&report)?);

            if run_once {
                return Ok(());
            }
            tracing::debug!(interval_secs = interval.as_secs(), "Sleeping until next scan");
            tokio::time::sleep(interval).await;
        }
    }
}

fn env_run_once() -> bool {
    std::env::var("BOT_RUN_ONCE")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
