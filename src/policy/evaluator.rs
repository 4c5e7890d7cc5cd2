//! Threshold evaluation and per-family state transitions.
//!
//! Per key the state machine is `ABSENT ⇄ ARMED(value)`: a breach that
//! fires arms (or re-arms) the key, a suppressed breach leaves it untouched,
//! and a value back in the normal range clears the whole family regardless
//! of whether anything fired this run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{MetricFamily, MetricKey};
use crate::store::AlertState;

use super::{AlertReason, ReAlertPolicy};

/// Bounds for one metric family. `high` is optional: the minimal USDT
/// configuration is one-sided, gold always carries both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low: Decimal,
    pub high: Option<Decimal>,
}

/// Result of evaluating one family's value for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Bound breached and the policy fired; state was re-armed.
    Triggered { key: MetricKey, reason: AlertReason },
    /// Bound breached but the policy held the notification back.
    Suppressed { key: MetricKey, reason: AlertReason },
    /// Value inside the normal range; any armed keys were cleared.
    Normal,
}

impl Outcome {
    #[must_use]
    pub fn fired(&self) -> bool {
        matches!(self, Outcome::Triggered { .. })
    }
}

/// Evaluate `value` against the family's bounds, applying the
/// re-notification policy and the state transitions it implies.
///
/// The two breach directions are mutually exclusive, so entering one always
/// clears the other key's entry, and the normal range clears both.
pub fn evaluate(
    family: MetricFamily,
    value: Decimal,
    thresholds: &Thresholds,
    policy: &ReAlertPolicy,
    state: &mut AlertState,
    now: DateTime<Utc>,
) -> Outcome {
    let low_key = family.low_key();
    let high_key = family.high_key();

    if value <= thresholds.low {
        state.clear(high_key);
        return breach(low_key, value, policy, state, now);
    }

    if let Some(high) = thresholds.high {
        if value >= high {
            state.clear(low_key);
            return breach(high_key, value, policy, state, now);
        }
    }

    if state.clear_family(family) {
        debug!(family = %family, value = %value, "recovered to normal range, state cleared");
    }
    Outcome::Normal
}

fn breach(
    key: MetricKey,
    value: Decimal,
    policy: &ReAlertPolicy,
    state: &mut AlertState,
    now: DateTime<Utc>,
) -> Outcome {
    let decision = policy.decide(state, key, value);
    if decision.fire {
        state.record(key, value, now);
        Outcome::Triggered {
            key,
            reason: decision.reason,
        }
    } else {
        Outcome::Suppressed {
            key,
            reason: decision.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gold_thresholds() -> Thresholds {
        Thresholds {
            low: dec!(0),
            high: Some(dec!(10)),
        }
    }

    fn usdt_thresholds() -> Thresholds {
        Thresholds {
            low: dec!(0),
            high: None,
        }
    }

    fn gap_policy() -> ReAlertPolicy {
        ReAlertPolicy::GapBased { gap: dec!(0.5) }
    }

    #[test]
    fn low_breach_on_empty_state_triggers_and_arms() {
        let mut state = AlertState::default();
        let outcome = evaluate(
            MetricFamily::Usdt,
            dec!(-1.2),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            Utc::now(),
        );

        assert_eq!(
            outcome,
            Outcome::Triggered {
                key: MetricKey::UsdtLow,
                reason: AlertReason::FirstAlert,
            }
        );
        assert_eq!(state.entry(MetricKey::UsdtLow).unwrap().value, dec!(-1.2));
    }

    #[test]
    fn suppressed_breach_keeps_prior_entry() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::UsdtLow, dec!(-1.2), now);

        let outcome = evaluate(
            MetricFamily::Usdt,
            dec!(-1.3),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );

        assert!(matches!(outcome, Outcome::Suppressed { .. }));
        // Prior value untouched; next run still compares against -1.2.
        assert_eq!(state.entry(MetricKey::UsdtLow).unwrap().value, dec!(-1.2));
    }

    #[test]
    fn normal_range_clears_both_keys() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::GoldLow, dec!(-0.5), now);

        let outcome = evaluate(
            MetricFamily::Gold,
            dec!(4.0),
            &gold_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );

        assert_eq!(outcome, Outcome::Normal);
        assert!(state.is_empty());
        assert!(state.dirty());
    }

    #[test]
    fn normal_range_with_no_entries_mutates_nothing() {
        let mut state = AlertState::default();
        let outcome = evaluate(
            MetricFamily::Gold,
            dec!(4.0),
            &gold_thresholds(),
            &gap_policy(),
            &mut state,
            Utc::now(),
        );

        assert_eq!(outcome, Outcome::Normal);
        assert!(!state.dirty());
    }

    #[test]
    fn crossing_low_to_high_swaps_armed_key() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::GoldLow, dec!(-0.5), now);

        let outcome = evaluate(
            MetricFamily::Gold,
            dec!(12.0),
            &gold_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );

        // gold_low cleared, gold_high evaluated as a first alert.
        assert_eq!(
            outcome,
            Outcome::Triggered {
                key: MetricKey::GoldHigh,
                reason: AlertReason::FirstAlert,
            }
        );
        assert!(state.entry(MetricKey::GoldLow).is_none());
        assert_eq!(state.entry(MetricKey::GoldHigh).unwrap().value, dec!(12.0));
    }

    #[test]
    fn keys_never_armed_simultaneously() {
        let mut state = AlertState::default();
        let now = Utc::now();
        let thresholds = gold_thresholds();
        let policy = gap_policy();

        for value in [dec!(-1), dec!(12), dec!(-2), dec!(15), dec!(5)] {
            evaluate(MetricFamily::Gold, value, &thresholds, &policy, &mut state, now);
            let both = state.entry(MetricKey::GoldLow).is_some()
                && state.entry(MetricKey::GoldHigh).is_some();
            assert!(!both, "both gold keys armed after value {value}");
        }
    }

    #[test]
    fn one_sided_family_ignores_high_values() {
        let mut state = AlertState::default();
        let outcome = evaluate(
            MetricFamily::Usdt,
            dec!(50.0),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            Utc::now(),
        );

        assert_eq!(outcome, Outcome::Normal);
        assert!(state.is_empty());
    }

    #[test]
    fn stale_legacy_high_entry_cleared_on_low_breach() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::UsdtHigh, dec!(3.0), now);

        evaluate(
            MetricFamily::Usdt,
            dec!(-0.5),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );

        assert!(state.entry(MetricKey::UsdtHigh).is_none());
        assert!(state.entry(MetricKey::UsdtLow).is_some());
    }

    #[test]
    fn value_exactly_at_bound_breaches() {
        let mut state = AlertState::default();
        let now = Utc::now();

        let at_low = evaluate(
            MetricFamily::Gold,
            dec!(0),
            &gold_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );
        assert!(at_low.fired());

        let mut state = AlertState::default();
        let at_high = evaluate(
            MetricFamily::Gold,
            dec!(10),
            &gold_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );
        assert!(at_high.fired());
    }

    #[test]
    fn evaluation_is_idempotent_for_suppressed_breach() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::UsdtLow, dec!(-1.2), now);

        let first = evaluate(
            MetricFamily::Usdt,
            dec!(-1.3),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );
        let second = evaluate(
            MetricFamily::Usdt,
            dec!(-1.3),
            &usdt_thresholds(),
            &gap_policy(),
            &mut state,
            now,
        );
        assert_eq!(first, second);
    }
}
