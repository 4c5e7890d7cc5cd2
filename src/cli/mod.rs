//! Command-line interface definitions.

pub mod check;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kimp - kimchi-premium monitor with stateful threshold alerts.
#[derive(Parser, Debug)]
#[command(name = "kimp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one monitoring pass
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(long, default_value = "kimp.toml")]
    pub config: PathBuf,

    /// Manually triggered run: send a status report even when nothing
    /// breached (scheduled runs stay silent in the normal range)
    #[arg(long)]
    pub manual: bool,

    /// Force JSON log output
    #[arg(long)]
    pub json_logs: bool,
}

/// Subcommands for `kimp check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
    /// Send a test message through the configured notifier
    Telegram(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(long, default_value = "kimp.toml")]
    pub config: PathBuf,
}
