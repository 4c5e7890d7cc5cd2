//! Handlers for the `check` diagnostics.

use crate::cli::{CheckCommand, ConfigPathArg};
use crate::config::Config;
use crate::error::Result;

pub async fn execute(command: &CheckCommand) -> Result<()> {
    match command {
        CheckCommand::Config(args) => check_config(args),
        CheckCommand::Telegram(args) => check_telegram(args).await,
    }
}

fn check_config(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    println!("config ok: {}", args.config.display());
    println!(
        "  usdt: low {}{}",
        config.thresholds.usdt_low,
        config
            .thresholds
            .usdt_high
            .map_or_else(String::new, |h| format!(", high {h}"))
    );
    println!(
        "  gold: low {}, high {}",
        config.thresholds.gold_low, config.thresholds.gold_high
    );
    println!("  gap: {}", config.alerting.gap);
    println!("  store: {:?}", config.store.backend);
    Ok(())
}

async fn check_telegram(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;

    #[cfg(feature = "telegram")]
    {
        use crate::notify::{Notifier, TelegramConfig, TelegramNotifier};

        if !config.telegram.enabled {
            println!("telegram disabled in config");
            return Ok(());
        }
        let Some(telegram) = TelegramConfig::from_env() else {
            println!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set");
            return Ok(());
        };
        let notifier = TelegramNotifier::new(telegram);
        notifier.send("✅ kimp: telegram check").await?;
        println!("test message sent");
        Ok(())
    }

    #[cfg(not(feature = "telegram"))]
    {
        let _ = config;
        println!("built without telegram support");
        Ok(())
    }
}
