//! Upbit USDT/KRW ticker.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FetchError;

use super::PriceSource;

const TICKER_URL: &str = "https://api.upbit.com/v1/ticker";

#[derive(Debug, Deserialize)]
struct Ticker {
    trade_price: Decimal,
}

/// Last trade price of the KRW-USDT market on Upbit.
pub struct UpbitUsdtSource;

#[async_trait]
impl PriceSource for UpbitUsdtSource {
    fn name(&self) -> &'static str {
        "upbit"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let tickers: Vec<Ticker> = client
            .get(TICKER_URL)
            .query(&[("markets", "KRW-USDT")])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ticker = tickers
            .first()
            .ok_or_else(|| FetchError::Parse("empty ticker response".into()))?;
        Ok(ticker.trade_price)
    }
}
