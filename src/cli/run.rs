//! Handler for the `run` command.

use tracing::info;

use crate::app::{App, RunMode};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;

/// Execute one monitoring pass. Returns the fatal FX-exhaustion error to
/// `main`, which maps it to a non-zero exit.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    let mode = if args.manual {
        RunMode::Manual
    } else {
        RunMode::Scheduled
    };
    info!(mode = ?mode, "kimp starting");

    let app = App::from_config(&config, mode)?;
    let report = app.run().await?;

    info!(
        usdt = ?report.usdt.map(|r| r.premium.round_dp(2)),
        gold = ?report.gold.map(|r| r.premium.round_dp(2)),
        alerts_sent = report.alerts_sent,
        state_saved = report.state_saved,
        "run complete"
    );
    Ok(())
}
