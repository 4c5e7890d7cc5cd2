//! Outbound notification channel.

#[cfg(feature = "telegram")]
mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramNotifier};

use async_trait::async_trait;
use tracing::info;

use crate::error::NotifyError;

/// Delivery of composed alert text to the external channel.
///
/// Send failures are the caller's to log and swallow: a failed
/// notification never aborts state persistence or the run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &'static str;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Fallback when no transport is configured: the message goes to the log
/// and delivery always succeeds.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(message = text, "notification (no transport configured)");
        Ok(())
    }
}
