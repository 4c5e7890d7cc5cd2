//! Domestic KRX spot gold (KRW per gram), scraped from Naver finance.
//!
//! There is no public API for the KRX spot gold quote, so these adapters
//! pattern-match the price out of the mobile and desktop pages. Every
//! extraction is range-checked (50,000–1,000,000 KRW/g) so a layout change
//! degrades to a source failure instead of a bogus alert.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FetchError;

use super::{check_range, parse_grouped, PriceSource};

const MOBILE_URL: &str = "https://m.stock.naver.com/marketindex/metals/M04020000";
const DESKTOP_URL: &str = "https://finance.naver.com/marketindex/goldDaily498498.naver";

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0";

// Scraped pages get a longer budget than the JSON APIs.
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

const PRICE_LO: Decimal = dec!(50000);
const PRICE_HI: Decimal = dec!(1000000);

fn mobile_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // "233,910원/g"
            r"([\d,]+)\s*원/g",
            // embedded JSON: "currentPrice": "233,910"
            r#""currentPrice"\s*:\s*"?([\d,.]+)"?"#,
            // "금 현물 233,910원"
            r"금.*?(\d{3},\d{3})\s*원",
            // <span class="price">233910
            r#"class="price"[^>]*>([\d,]+)"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
    })
}

fn desktop_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([\d,]+)\s*원").expect("static pattern"))
}

/// Try each mobile pattern in order; first in-range match wins.
fn extract_mobile_price(text: &str) -> Result<Decimal, FetchError> {
    for pattern in mobile_patterns() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(raw) = captures.get(1) {
                if let Ok(price) = parse_grouped(raw.as_str()) {
                    if check_range(price, PRICE_LO, PRICE_HI).is_ok() {
                        return Ok(price);
                    }
                }
            }
        }
    }
    Err(FetchError::Parse(format!(
        "no gold price found in page ({} bytes)",
        text.len()
    )))
}

fn extract_desktop_price(text: &str) -> Result<Decimal, FetchError> {
    let captures = desktop_pattern()
        .captures(text)
        .ok_or_else(|| FetchError::Parse("no won amount in page".into()))?;
    let raw = captures
        .get(1)
        .ok_or_else(|| FetchError::Parse("empty capture".into()))?;
    let price = parse_grouped(raw.as_str())?;
    check_range(price, PRICE_LO, PRICE_HI)
}

/// Primary: Naver mobile metals page.
pub struct NaverMobileGoldSource;

#[async_trait]
impl PriceSource for NaverMobileGoldSource {
    fn name(&self) -> &'static str {
        "naver-mobile"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let text = client
            .get(MOBILE_URL)
            .header(reqwest::header::USER_AGENT, MOBILE_USER_AGENT)
            .timeout(SCRAPE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_mobile_price(&text)
    }
}

/// Fallback: Naver desktop daily gold page.
pub struct NaverDesktopGoldSource;

#[async_trait]
impl PriceSource for NaverDesktopGoldSource {
    fn name(&self) -> &'static str {
        "naver-desktop"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Decimal, FetchError> {
        let text = client
            .get(DESKTOP_URL)
            .header(reqwest::header::USER_AGENT, DESKTOP_USER_AGENT)
            .timeout(SCRAPE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_desktop_price(&text)
    }
}
