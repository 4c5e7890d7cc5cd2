//! International gold (GC=F front-month futures) via the Yahoo Finance
//! chart API.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FetchError;

use super::PriceSource;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/GC=F";
const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<Decimal>,
}

/// USD per troy ounce of the COMEX gold front-month contract.
pub struct YahooGoldSource;

#[async_trait]
impl PriceSource for YahooGoldSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let response: ChartResponse = client
            .get(CHART_URL)
            .query(&[("range", "1d"), ("interval", "1d")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .chart
            .result
            .as_deref()
            .and_then(<[ChartResult]>::first)
            .and_then(|r| r.meta.regular_market_price)
            .ok_or_else(|| FetchError::Parse("no regularMarketPrice in chart".into()))
    }
}
