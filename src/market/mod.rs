//! Upstream price sources.
//!
//! Every raw input (FX rate, Upbit USDT, domestic gold, international gold)
//! comes from an ordered chain of [`PriceSource`] adapters. Each adapter is
//! tried once, in priority order, and the first success wins; there is no
//! retry-with-backoff. Exhausting a chain is fatal only for the FX rate.

mod fx;
mod gold;
mod upbit;
mod yahoo;

pub use fx::{ErApiFxSource, JsdelivrFxSource};
pub use gold::{NaverDesktopGoldSource, NaverMobileGoldSource};
pub use upbit::UpbitUsdtSource;
pub use yahoo::YahooGoldSource;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{Error, FetchError};

/// One upstream quote provider for a single numeric price.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError>;
}

/// Try each source once in order; first success wins.
pub async fn fetch_first(
    client: &reqwest::Client,
    sources: &[Box<dyn PriceSource>],
    quantity: &'static str,
) -> Result<Decimal, Error> {
    for source in sources {
        match source.fetch(client).await {
            Ok(price) => {
                info!(source = source.name(), quantity, price = %price, "price fetched");
                return Ok(price);
            }
            Err(e) => {
                warn!(source = source.name(), quantity, error = %e, "price source failed");
            }
        }
    }
    Err(Error::SourceUnavailable { quantity })
}

/// Shared guard for scraped prices: reject values outside a plausible
/// window instead of alerting on a mis-parse.
fn check_range(value: Decimal, lo: Decimal, hi: Decimal) -> Result<Decimal, FetchError> {
    if value > lo && value < hi {
        Ok(value)
    } else {
        Err(FetchError::OutOfRange { value, lo, hi })
    }
}

/// Parse a comma-grouped number ("233,910" or "233,910.5").
fn parse_grouped(raw: &str) -> Result<Decimal, FetchError> {
    raw.replace(',', "")
        .parse::<Decimal>()
        .map_err(|e| FetchError::Parse(format!("bad number {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_grouped_strips_separators() {
        assert_eq!(parse_grouped("233,910").unwrap(), dec!(233910));
        assert_eq!(parse_grouped("1,430.55").unwrap(), dec!(1430.55));
        assert!(parse_grouped("원").is_err());
    }

    #[test]
    fn check_range_is_exclusive() {
        assert!(check_range(dec!(233910), dec!(50000), dec!(1000000)).is_ok());
        assert!(check_range(dec!(50000), dec!(50000), dec!(1000000)).is_err());
        assert!(check_range(dec!(3), dec!(50000), dec!(1000000)).is_err());
    }
}
