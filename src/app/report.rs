//! Alert and summary message composition.
//!
//! Messages are HTML-formatted for the Telegram transport and readable as
//! plain text when the log notifier is in play. All timestamps are KST,
//! the market the monitor watches.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::policy::{AlertReason, Thresholds};

use super::{GoldReading, UsdtReading};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Current time in KST.
#[must_use]
pub fn kst_now() -> DateTime<FixedOffset> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).expect("KST offset is in range");
    Utc::now().with_timezone(&kst)
}

/// Signed percent with up to two decimals, e.g. `+1.23%` / `-0.8%`.
/// Normalized so the rendering is independent of the value's scale
/// (`0.500` and `0.5` both come out as `+0.5%`).
#[must_use]
pub fn signed_pct(value: Decimal) -> String {
    let rounded = value.round_dp(2).normalize();
    if rounded.is_sign_negative() {
        format!("{rounded}%")
    } else {
        format!("+{rounded}%")
    }
}

fn krw(value: Decimal) -> String {
    format!("{}원", value.round_dp(0))
}

/// USDT breach alert body.
#[must_use]
pub fn usdt_alert(
    reading: &UsdtReading,
    bound_label: &str,
    reason: &AlertReason,
    now: DateTime<FixedOffset>,
) -> String {
    let emoji = if reading.premium < Decimal::ZERO {
        "🔵"
    } else {
        "🟡"
    };
    format!(
        "{emoji} <b>테더 김프 알림</b> ({bound_label})\n\
         김프: <b>{kimp}</b> — {reason}\n\
         Upbit USDT: {upbit}\n\
         환율(USD/KRW): {fx}\n\
         차이: {diff}\n\
         ⏰ {time} KST",
        kimp = signed_pct(reading.premium),
        upbit = krw(reading.upbit_price),
        fx = krw(reading.fx_rate),
        diff = krw(reading.upbit_price - reading.fx_rate),
        time = now.format("%H:%M"),
    )
}

/// Gold breach alert body.
#[must_use]
pub fn gold_alert(
    reading: &GoldReading,
    bound_label: &str,
    reason: &AlertReason,
    now: DateTime<FixedOffset>,
) -> String {
    let emoji = if reading.premium < Decimal::ZERO {
        "🔵"
    } else {
        "🔴"
    };
    format!(
        "{emoji} <b>금 김프 알림</b> ({bound_label})\n\
         김프: <b>{kimp}</b> — {reason}\n\
         국내(KRX): {domestic}/g\n\
         국제: {intl}/g (${intl_oz}/oz)\n\
         환율(USD/KRW): {fx}\n\
         ⏰ {time} KST",
        kimp = signed_pct(reading.premium),
        domestic = krw(reading.domestic_krw_per_gram),
        intl = krw(reading.intl_krw_per_gram),
        intl_oz = reading.intl_usd_per_oz.round_dp(2),
        fx = krw(reading.fx_rate),
        time = now.format("%H:%M"),
    )
}

/// Sent before the run aborts when no FX source answered.
#[must_use]
pub fn fx_failure(error: &crate::error::Error) -> String {
    format!("❌ USD/KRW 환율 조회 실패: {error}")
}

/// Manual-run status report when nothing breached.
#[must_use]
pub fn summary(
    usdt: Option<&UsdtReading>,
    gold: Option<&GoldReading>,
    usdt_thresholds: &Thresholds,
    gold_thresholds: &Thresholds,
    now: DateTime<FixedOffset>,
) -> String {
    let usdt_line = usdt.map_or_else(|| "N/A".to_string(), |r| signed_pct(r.premium));
    let gold_line = gold.map_or_else(|| "N/A".to_string(), |r| signed_pct(r.premium));
    let gold_high = gold_thresholds
        .high
        .map_or_else(String::new, |h| format!(" 또는 ≥{h}%"));
    let usdt_high = usdt_thresholds
        .high
        .map_or_else(String::new, |h| format!(" 또는 ≥{h}%"));

    format!(
        "✅ <b>김프 현황</b> (정상 범위)\n\
         테더 김프: {usdt_line}\n\
         금 김프: {gold_line}\n\
         조건: 테더 ≤{usdt_low}%{usdt_high} | 금 ≤{gold_low}%{gold_high}\n\
         ⏰ {time} KST",
        usdt_low = usdt_thresholds.low,
        gold_low = gold_thresholds.low,
        time = now.format("%Y-%m-%d %H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usdt_reading() -> UsdtReading {
        UsdtReading {
            premium: dec!(-1.23),
            upbit_price: dec!(1415.7),
            fx_rate: dec!(1430),
        }
    }

    fn gold_reading() -> GoldReading {
        GoldReading {
            premium: dec!(11.25),
            domestic_krw_per_gram: dec!(93000),
            intl_usd_per_oz: dec!(2000),
            intl_krw_per_gram: dec!(83592),
            fx_rate: dec!(1300),
        }
    }

    #[test]
    fn signed_pct_formats_both_signs() {
        assert_eq!(signed_pct(dec!(-1.234)), "-1.23%");
        assert_eq!(signed_pct(dec!(2.1)), "+2.1%");
        assert_eq!(signed_pct(Decimal::ZERO), "+0%");
    }

    #[test]
    fn signed_pct_is_scale_independent() {
        // Division leaves trailing zeros on the scale; rendering must not.
        let computed = (dec!(1005) - dec!(1000)) / dec!(1000) * dec!(100);
        assert_eq!(signed_pct(computed), "+0.5%");
        assert_eq!(signed_pct(dec!(0.500)), "+0.5%");
        assert_eq!(signed_pct(dec!(-1.200)), "-1.2%");
    }

    #[test]
    fn usdt_alert_carries_reason_and_prices() {
        let text = usdt_alert(
            &usdt_reading(),
            "≤ 0%",
            &AlertReason::FirstAlert,
            kst_now(),
        );
        assert!(text.contains("테더 김프 알림"));
        assert!(text.contains("-1.23%"));
        assert!(text.contains("first alert"));
        assert!(text.contains("1430원"));
    }

    #[test]
    fn usdt_alert_blue_for_negative_premium() {
        let text = usdt_alert(
            &usdt_reading(),
            "≤ 0%",
            &AlertReason::FirstAlert,
            kst_now(),
        );
        assert!(text.starts_with("🔵"));
    }

    #[test]
    fn gold_alert_red_for_high_breach() {
        let text = gold_alert(
            &gold_reading(),
            "≥ 10%",
            &AlertReason::Worsening {
                prior: dec!(10.5),
                diff: dec!(0.75),
            },
            kst_now(),
        );
        assert!(text.starts_with("🔴"));
        assert!(text.contains("+11.25%"));
        assert!(text.contains("worsening"));
        assert!(text.contains("$2000.00/oz") || text.contains("$2000/oz"));
    }

    #[test]
    fn summary_handles_missing_legs() {
        let gold = gold_reading();
        let text = summary(
            None,
            Some(&gold),
            &Thresholds {
                low: Decimal::ZERO,
                high: None,
            },
            &Thresholds {
                low: Decimal::ZERO,
                high: Some(dec!(10)),
            },
            kst_now(),
        );
        assert!(text.contains("테더 김프: N/A"));
        assert!(text.contains("금 김프: +11.25%"));
        assert!(text.contains("≥10%"));
    }
}
