//! Scan command implementation

use crate::config::Config;
use crate::engine::ScanEngine;
use clap::Args;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Force the paper-trading ledger on, regardless of config
    #[arg(long)]
    pub paper: bool,
}

impl ScanArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let engine = ScanEngine::from_config(config)?;
        let report = engine.run_scan(self.paper).await?;
        println!("{}", serde_json::to_string(&report)?);
        Ok(())
    }
}
