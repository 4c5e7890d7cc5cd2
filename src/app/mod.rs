//! Run orchestration.
//!
//! One invocation is one sequential pass: load state → fetch FX → evaluate
//! the USDT leg → evaluate the gold leg → batch-send any alerts → persist
//! state if it changed. Runs are independent; the scheduler spaces them.

pub mod report;

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::config::{Config, StoreBackend};
use crate::domain::{gold_premium, usdt_premium, MetricFamily};
use crate::error::{Error, Result};
use crate::market::{
    fetch_first, ErApiFxSource, JsdelivrFxSource, NaverDesktopGoldSource, NaverMobileGoldSource,
    PriceSource, UpbitUsdtSource, YahooGoldSource,
};
use crate::notify::{LogNotifier, Notifier};
use crate::policy::{evaluate, Outcome, ReAlertPolicy, Thresholds};
use crate::store::{AlertState, FileStore, GistStore, StateStore};

#[cfg(feature = "telegram")]
use crate::notify::{TelegramConfig, TelegramNotifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How this run was triggered. Manual runs report status even when nothing
/// breached; scheduled runs stay silent in the normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Scheduled,
    Manual,
}

/// Adapter chains for each raw input, in priority order.
pub struct MarketSources {
    pub fx: Vec<Box<dyn PriceSource>>,
    pub usdt: Vec<Box<dyn PriceSource>>,
    pub gold_domestic: Vec<Box<dyn PriceSource>>,
    pub gold_intl: Vec<Box<dyn PriceSource>>,
}

impl MarketSources {
    /// The production chains.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fx: vec![Box::new(ErApiFxSource), Box::new(JsdelivrFxSource)],
            usdt: vec![Box::new(UpbitUsdtSource)],
            gold_domestic: vec![
                Box::new(NaverMobileGoldSource),
                Box::new(NaverDesktopGoldSource),
            ],
            gold_intl: vec![Box::new(YahooGoldSource)],
        }
    }
}

/// Raw inputs and computed premium for the USDT leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsdtReading {
    pub premium: Decimal,
    pub upbit_price: Decimal,
    pub fx_rate: Decimal,
}

/// Raw inputs and computed premium for the gold leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldReading {
    pub premium: Decimal,
    pub domestic_krw_per_gram: Decimal,
    pub intl_usd_per_oz: Decimal,
    pub intl_krw_per_gram: Decimal,
    pub fx_rate: Decimal,
}

/// What one run observed and did, for CLI output and tests.
#[derive(Debug, Default)]
pub struct RunReport {
    pub usdt: Option<UsdtReading>,
    pub gold: Option<GoldReading>,
    pub alerts_sent: usize,
    pub state_saved: bool,
}

pub struct App {
    usdt_thresholds: Thresholds,
    gold_thresholds: Thresholds,
    policy: ReAlertPolicy,
    mode: RunMode,
    store: Option<Box<dyn StateStore>>,
    notifier: Box<dyn Notifier>,
    sources: MarketSources,
    client: reqwest::Client,
}

impl App {
    /// Assemble the production wiring from configuration.
    pub fn from_config(config: &Config, mode: RunMode) -> Result<Self> {
        let store = build_store(config)?;
        let notifier = build_notifier(config);
        Self::new(config, mode, store, notifier, MarketSources::live())
    }

    /// Explicit wiring; the seam the tests use.
    pub fn new(
        config: &Config,
        mode: RunMode,
        store: Option<Box<dyn StateStore>>,
        notifier: Box<dyn Notifier>,
        sources: MarketSources,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            usdt_thresholds: config.usdt_thresholds(),
            gold_thresholds: config.gold_thresholds(),
            policy: config.policy(),
            mode,
            store,
            notifier,
            sources,
            client,
        })
    }

    /// Execute one full monitoring pass.
    ///
    /// The only error this returns is FX exhaustion (after sending a
    /// failure notification); everything else degrades and the run
    /// completes with exit code 0.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut state = self.load_state().await;
        let mut alerts: Vec<String> = Vec::new();

        // FX first: both legs depend on it, so exhaustion aborts the run.
        let fx_rate = match fetch_first(&self.client, &self.sources.fx, "USD/KRW rate").await {
            Ok(rate) => rate,
            Err(e) => {
                error!(error = %e, "FX rate unavailable, aborting run");
                self.send(&report::fx_failure(&e)).await;
                return Err(e);
            }
        };

        // Each metric leg fails independently: log, skip, keep going.
        match self.usdt_leg(fx_rate, &mut state).await {
            Ok((reading, alert)) => {
                report.usdt = Some(reading);
                alerts.extend(alert);
            }
            Err(e) => warn!(error = %e, "USDT leg skipped this run"),
        }

        match self.gold_leg(fx_rate, &mut state).await {
            Ok((reading, alert)) => {
                report.gold = Some(reading);
                alerts.extend(alert);
            }
            Err(e) => warn!(error = %e, "gold leg skipped this run"),
        }

        if !alerts.is_empty() {
            info!(count = alerts.len(), "sending alerts");
            self.send(&alerts.join("\n\n")).await;
            report.alerts_sent = alerts.len();
        } else if self.mode == RunMode::Manual {
            let text = report::summary(
                report.usdt.as_ref(),
                report.gold.as_ref(),
                &self.usdt_thresholds,
                &self.gold_thresholds,
                report::kst_now(),
            );
            self.send(&text).await;
        } else {
            info!("normal range, no alerts");
        }

        report.state_saved = self.save_state(&state).await;
        Ok(report)
    }

    async fn usdt_leg(
        &self,
        fx_rate: Decimal,
        state: &mut AlertState,
    ) -> Result<(UsdtReading, Option<String>)> {
        let upbit_price = fetch_first(&self.client, &self.sources.usdt, "Upbit USDT/KRW").await?;
        let premium = usdt_premium(upbit_price, fx_rate)?;
        info!(premium = %premium.round_dp(2), "USDT kimp computed");

        let reading = UsdtReading {
            premium,
            upbit_price,
            fx_rate,
        };

        let outcome = evaluate(
            MetricFamily::Usdt,
            premium,
            &self.usdt_thresholds,
            &self.policy,
            state,
            Utc::now(),
        );
        let alert = self
            .alert_text(&outcome, &self.usdt_thresholds)
            .map(|(label, reason)| report::usdt_alert(&reading, &label, &reason, report::kst_now()));

        Ok((reading, alert))
    }

    async fn gold_leg(
        &self,
        fx_rate: Decimal,
        state: &mut AlertState,
    ) -> Result<(GoldReading, Option<String>)> {
        let domestic =
            fetch_first(&self.client, &self.sources.gold_domestic, "KRX gold KRW/g").await?;
        let intl_usd_per_oz =
            fetch_first(&self.client, &self.sources.gold_intl, "intl gold USD/oz").await?;
        let gold = gold_premium(domestic, intl_usd_per_oz, fx_rate)?;
        info!(
            premium = %gold.premium.round_dp(2),
            domestic = %domestic.round_dp(0),
            intl_krw_per_gram = %gold.intl_krw_per_gram.round_dp(0),
            "gold kimp computed"
        );

        let reading = GoldReading {
            premium: gold.premium,
            domestic_krw_per_gram: domestic,
            intl_usd_per_oz,
            intl_krw_per_gram: gold.intl_krw_per_gram,
            fx_rate,
        };

        let outcome = evaluate(
            MetricFamily::Gold,
            gold.premium,
            &self.gold_thresholds,
            &self.policy,
            state,
            Utc::now(),
        );
        let alert = self
            .alert_text(&outcome, &self.gold_thresholds)
            .map(|(label, reason)| report::gold_alert(&reading, &label, &reason, report::kst_now()));

        Ok((reading, alert))
    }

    /// Bound label and reason for a fired outcome; `None` when nothing fired.
    fn alert_text(
        &self,
        outcome: &Outcome,
        thresholds: &Thresholds,
    ) -> Option<(String, crate::policy::AlertReason)> {
        match outcome {
            Outcome::Triggered { key, reason } => {
                let label = match key.direction() {
                    crate::domain::Direction::Low => format!("≤ {}%", thresholds.low),
                    crate::domain::Direction::High => {
                        // A high key only triggers when the bound exists.
                        thresholds
                            .high
                            .map_or_else(String::new, |h| format!("≥ {h}%"))
                    }
                };
                Some((label, *reason))
            }
            Outcome::Suppressed { key, reason } => {
                info!(key = %key, reason = %reason, "alert suppressed");
                None
            }
            Outcome::Normal => None,
        }
    }

    async fn load_state(&self) -> AlertState {
        let Some(store) = &self.store else {
            info!("no state store configured, every breach will notify");
            return AlertState::default();
        };
        match store.load().await {
            Ok(state) => {
                info!(backend = store.name(), entries = state.len(), "alert state loaded");
                state
            }
            Err(e) => {
                warn!(backend = store.name(), error = %e, "state load failed, starting empty");
                AlertState::default()
            }
        }
    }

    /// Persist only when mutated; failures are logged and swallowed.
    async fn save_state(&self, state: &AlertState) -> bool {
        if !state.dirty() {
            return false;
        }
        let Some(store) = &self.store else {
            return false;
        };
        match store.save(state).await {
            Ok(()) => {
                info!(backend = store.name(), entries = state.len(), "alert state saved");
                true
            }
            Err(e) => {
                warn!(backend = store.name(), error = %e, "state save failed");
                false
            }
        }
    }

    async fn send(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            error!(channel = self.notifier.name(), error = %e, "notification failed");
        }
    }
}

fn build_store(config: &Config) -> Result<Option<Box<dyn StateStore>>> {
    match config.store.backend {
        StoreBackend::None => Ok(None),
        StoreBackend::File => Ok(Some(Box::new(FileStore::new(config.store.path.clone())))),
        StoreBackend::Gist => {
            // validate() guarantees gist_id is present for this backend.
            let Some(gist_id) = config.store.gist_id.clone() else {
                return Ok(None);
            };
            match std::env::var("GIST_TOKEN") {
                Ok(token) => {
                    let store = GistStore::new(gist_id, token).map_err(Error::Store)?;
                    Ok(Some(Box::new(store)))
                }
                Err(_) => {
                    warn!("GIST_TOKEN not set, running stateless");
                    Ok(None)
                }
            }
        }
    }
}

fn build_notifier(config: &Config) -> Box<dyn Notifier> {
    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        if let Some(telegram) = TelegramConfig::from_env() {
            return Box::new(TelegramNotifier::new(telegram));
        }
        warn!("telegram enabled but credentials missing, falling back to log");
    }

    #[cfg(not(feature = "telegram"))]
    let _ = config;

    Box::new(LogNotifier)
}
