//! Premium (kimp) math.
//!
//! Pure functions converting raw prices into percentage spreads. Inputs are
//! expected to be positive; zero or negative rates are rejected rather than
//! divided through.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Error, Result};

/// Grams per troy ounce, used to convert international gold quotes.
pub const TROY_OUNCE_GRAMS: Decimal = dec!(31.1035);

const HUNDRED: Decimal = dec!(100);

/// USDT premium: Upbit USDT/KRW trade price vs the USD/KRW rate.
pub fn usdt_premium(exchange_price: Decimal, fx_rate: Decimal) -> Result<Decimal> {
    if fx_rate <= Decimal::ZERO {
        return Err(Error::InvalidInput {
            what: "fx_rate",
            reason: format!("must be positive, got {fx_rate}"),
        });
    }
    Ok((exchange_price - fx_rate) / fx_rate * HUNDRED)
}

/// Gold premium with the converted international reference price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldPremium {
    /// Signed percentage spread of domestic over international.
    pub premium: Decimal,
    /// International price converted to KRW per gram; kept for reporting.
    pub intl_krw_per_gram: Decimal,
}

/// Gold premium: KRX spot gold (KRW/gram) vs international gold
/// (USD/troy-oz) through the FX rate.
pub fn gold_premium(
    domestic_krw_per_gram: Decimal,
    intl_usd_per_oz: Decimal,
    fx_rate: Decimal,
) -> Result<GoldPremium> {
    if fx_rate <= Decimal::ZERO {
        return Err(Error::InvalidInput {
            what: "fx_rate",
            reason: format!("must be positive, got {fx_rate}"),
        });
    }
    if intl_usd_per_oz <= Decimal::ZERO {
        return Err(Error::InvalidInput {
            what: "intl_usd_per_oz",
            reason: format!("must be positive, got {intl_usd_per_oz}"),
        });
    }

    let intl_krw_per_gram = intl_usd_per_oz * fx_rate / TROY_OUNCE_GRAMS;
    let premium = (domestic_krw_per_gram - intl_krw_per_gram) / intl_krw_per_gram * HUNDRED;

    Ok(GoldPremium {
        premium,
        intl_krw_per_gram,
    })
}
