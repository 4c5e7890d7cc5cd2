//! kimp - kimchi-premium monitor with stateful threshold alerts.
//!
//! Samples two cross-market spreads each run — the Upbit USDT/KRW premium
//! over the USD/KRW rate, and the KRX spot gold premium over international
//! gold — evaluates them against configured bounds, and sends deduplicated
//! Telegram alerts. Alert state is carried across invocations in a durable
//! key-value document so a still-breached metric only re-notifies once it
//! has moved a configurable gap from the last notified value.
//!
//! # Architecture
//!
//! Each invocation is a single sequential pass:
//!
//! adapters → premium math → policy engine (reads/writes state) →
//! orchestrator → notifier / state store
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with environment-only secrets
//! - [`domain`] - Metric identities and premium math
//! - [`policy`] - Re-notification policy engine and threshold evaluator
//! - [`store`] - Durable alert state (gist or local file)
//! - [`market`] - Upstream price sources with ordered fallback
//! - [`notify`] - Notification transports (Telegram behind the `telegram`
//!   feature)
//! - [`app`] - Run orchestration
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram notification transport
//! - `testkit` - In-memory fakes for integration tests

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod market;
pub mod notify;
pub mod policy;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
