//! USD/KRW rate sources.
//!
//! Two independent free APIs, tried in order. The FX rate is the one input
//! the run cannot proceed without.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FetchError;

use super::PriceSource;

const ER_API_URL: &str = "https://open.er-api.com/v6/latest/USD";
const JSDELIVR_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/usd.json";

/// Primary: open.er-api.com latest USD rates.
pub struct ErApiFxSource;

#[derive(Debug, Deserialize)]
struct ErApiResponse {
    rates: HashMap<String, Decimal>,
}

#[async_trait]
impl PriceSource for ErApiFxSource {
    fn name(&self) -> &'static str {
        "er-api"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let response: ErApiResponse = client
            .get(ER_API_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .rates
            .get("KRW")
            .copied()
            .ok_or_else(|| FetchError::Parse("KRW missing from rates".into()))
    }
}

/// Fallback: fawazahmed0 currency-api mirror on jsDelivr.
pub struct JsdelivrFxSource;

#[derive(Debug, Deserialize)]
struct JsdelivrResponse {
    usd: HashMap<String, Decimal>,
}

#[async_trait]
impl PriceSource for JsdelivrFxSource {
    fn name(&self) -> &'static str {
        "jsdelivr"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let response: JsdelivrResponse = client
            .get(JSDELIVR_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .usd
            .get("krw")
            .copied()
            .ok_or_else(|| FetchError::Parse("krw missing from usd rates".into()))
    }
}
