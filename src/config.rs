//! Configuration loading and validation.
//!
//! Settings come from a TOML file; secrets (Telegram credentials, gist
//! token) come from the environment only and never appear in the file.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::policy::{ReAlertPolicy, Thresholds};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Breach bounds per metric family, in signed percent.
///
/// `usdt_high` is the legacy two-sided variant and is off by default;
/// gold always carries both bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_usdt_low")]
    pub usdt_low: Decimal,
    #[serde(default)]
    pub usdt_high: Option<Decimal>,
    #[serde(default = "default_gold_low")]
    pub gold_low: Decimal,
    #[serde(default = "default_gold_high")]
    pub gold_high: Decimal,
}

fn default_usdt_low() -> Decimal {
    Decimal::ZERO
}

fn default_gold_low() -> Decimal {
    Decimal::ZERO
}

fn default_gold_high() -> Decimal {
    dec!(10)
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            usdt_low: default_usdt_low(),
            usdt_high: None,
            gold_low: default_gold_low(),
            gold_high: default_gold_high(),
        }
    }
}

/// Re-notification behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertingConfig {
    /// Minimum absolute change (percentage points) from the last notified
    /// value before a still-breached key re-notifies.
    #[serde(default = "default_gap")]
    pub gap: Decimal,
    /// `gap` (default) or `directional` for the stricter worsening-only rule.
    #[serde(default)]
    pub policy: PolicyKind,
}

fn default_gap() -> Decimal {
    dec!(0.5)
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            policy: PolicyKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Gap,
    Directional,
}

/// Telegram notification configuration. Credentials are read from
/// `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Durable state backend selection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Gist ID when `backend = "gist"`; the token comes from `GIST_TOKEN`.
    #[serde(default)]
    pub gist_id: Option<String>,
    /// State file path when `backend = "file"`.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("kimp-state.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            gist_id: None,
            path: default_state_path(),
        }
    }
}

/// `none` runs stateless: every breach notifies, nothing persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Gist,
    File,
    #[default]
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.alerting.gap < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "alerting.gap",
                reason: format!("must be non-negative, got {}", self.alerting.gap),
            }
            .into());
        }
        if self.thresholds.gold_low >= self.thresholds.gold_high {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.gold_high",
                reason: format!(
                    "must exceed gold_low ({} >= {})",
                    self.thresholds.gold_low, self.thresholds.gold_high
                ),
            }
            .into());
        }
        if let Some(usdt_high) = self.thresholds.usdt_high {
            if self.thresholds.usdt_low >= usdt_high {
                return Err(ConfigError::InvalidValue {
                    field: "thresholds.usdt_high",
                    reason: format!(
                        "must exceed usdt_low ({} >= {})",
                        self.thresholds.usdt_low, usdt_high
                    ),
                }
                .into());
            }
        }
        if self.store.backend == StoreBackend::Gist
            && self.store.gist_id.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::MissingField {
                field: "store.gist_id",
            }
            .into());
        }
        Ok(())
    }

    /// Bound pair for the USDT family (one-sided unless `usdt_high` is set).
    #[must_use]
    pub fn usdt_thresholds(&self) -> Thresholds {
        Thresholds {
            low: self.thresholds.usdt_low,
            high: self.thresholds.usdt_high,
        }
    }

    /// Bound pair for the gold family (always two-sided).
    #[must_use]
    pub fn gold_thresholds(&self) -> Thresholds {
        Thresholds {
            low: self.thresholds.gold_low,
            high: Some(self.thresholds.gold_high),
        }
    }

    #[must_use]
    pub fn policy(&self) -> ReAlertPolicy {
        match self.alerting.policy {
            PolicyKind::Gap => ReAlertPolicy::GapBased {
                gap: self.alerting.gap,
            },
            PolicyKind::Directional => ReAlertPolicy::DirectionalOnly,
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.thresholds.usdt_low, Decimal::ZERO);
        assert_eq!(config.thresholds.usdt_high, None);
        assert_eq!(config.thresholds.gold_low, Decimal::ZERO);
        assert_eq!(config.thresholds.gold_high, dec!(10));
        assert_eq!(config.alerting.gap, dec!(0.5));
        assert_eq!(config.alerting.policy, PolicyKind::Gap);
        assert_eq!(config.store.backend, StoreBackend::None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_config_parses() {
        let toml = r#"
            [thresholds]
            usdt_low = -0.5
            usdt_high = 3.0
            gold_low = -1.0
            gold_high = 12.0

            [alerting]
            gap = 0.3
            policy = "directional"

            [telegram]
            enabled = true

            [store]
            backend = "gist"
            gist_id = "abc123"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.thresholds.usdt_high, Some(dec!(3.0)));
        assert_eq!(config.policy(), ReAlertPolicy::DirectionalOnly);
        assert!(config.telegram.enabled);
        assert_eq!(config.store.backend, StoreBackend::Gist);
    }

    #[test]
    fn negative_gap_rejected() {
        let config: Config = toml::from_str("[alerting]\ngap = -0.1").unwrap();
        assert!(matches!(
            config.validate(),
            Err(crate::error::Error::Config(ConfigError::InvalidValue {
                field: "alerting.gap",
                ..
            }))
        ));
    }

    #[test]
    fn inverted_gold_bounds_rejected() {
        let config: Config =
            toml::from_str("[thresholds]\ngold_low = 10.0\ngold_high = 5.0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn gist_backend_requires_gist_id() {
        let config: Config = toml::from_str("[store]\nbackend = \"gist\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(crate::error::Error::Config(ConfigError::MissingField {
                field: "store.gist_id",
            }))
        ));
    }

    #[test]
    fn gap_policy_carries_configured_gap() {
        let config: Config = toml::from_str("[alerting]\ngap = 0.7").unwrap();
        assert_eq!(
            config.policy(),
            ReAlertPolicy::GapBased { gap: dec!(0.7) }
        );
    }

    #[test]
    fn one_sided_usdt_by_default() {
        let config = Config::default();
        assert_eq!(config.usdt_thresholds().high, None);
        assert_eq!(config.gold_thresholds().high, Some(dec!(10)));
    }
}
