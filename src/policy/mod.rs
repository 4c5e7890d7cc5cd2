//! Re-notification policy engine.
//!
//! Decides, given the current value and the last-notified entry for a key,
//! whether a fresh notification should go out. Two policies exist in the
//! monitor's history:
//!
//! - [`ReAlertPolicy::GapBased`] (default) — re-arm once the value has moved
//!   at least `gap` percentage points in either direction from the last
//!   notified value, labeling the move as worsening or fluctuation.
//! - [`ReAlertPolicy::DirectionalOnly`] — the earlier, stricter rule:
//!   re-notify only when the value is strictly further into the breach.
//!   Non-worsening moves never fire, whatever their size.

mod evaluator;

pub use evaluator::{evaluate, Outcome, Thresholds};

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{Direction, MetricKey};
use crate::store::AlertState;

/// Why a decision came out the way it did. Carries the prior value and the
/// signed change so messages can show the full picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertReason {
    /// No entry existed for the key (never alerted, cleared by recovery, or
    /// running stateless because storage is unavailable).
    FirstAlert,
    /// Change past the gap, moving further into the breach.
    Worsening { prior: Decimal, diff: Decimal },
    /// Change past the gap, moving against the breach direction.
    Fluctuation { prior: Decimal, diff: Decimal },
    /// Change below the gap (or non-worsening under the directional policy).
    Suppressed { prior: Decimal, diff: Decimal },
}

impl std::fmt::Display for AlertReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertReason::FirstAlert => write!(f, "first alert"),
            AlertReason::Worsening { prior, diff } => write!(
                f,
                "worsening: {}% → {}% (Δ{}%p)",
                signed(*prior),
                signed(prior + diff),
                signed(*diff)
            ),
            AlertReason::Fluctuation { prior, diff } => write!(
                f,
                "fluctuation: {}% → {}% (Δ{}%p)",
                signed(*prior),
                signed(prior + diff),
                signed(*diff)
            ),
            AlertReason::Suppressed { prior, diff } => write!(
                f,
                "suppressed: {}% → {}% (Δ{}%p)",
                signed(*prior),
                signed(prior + diff),
                signed(*diff)
            ),
        }
    }
}

/// Render a decimal with an explicit sign, two decimal places.
fn signed(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() {
        rounded.to_string()
    } else {
        format!("+{rounded}")
    }
}

/// Outcome of [`ReAlertPolicy::decide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub fire: bool,
    pub reason: AlertReason,
}

/// Re-notification strategy. Gap-based is canonical; the directional
/// variant is kept so the earlier behavior stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReAlertPolicy {
    GapBased { gap: Decimal },
    DirectionalOnly,
}

impl ReAlertPolicy {
    /// Decide whether a breach of `key` at `value` should notify, against
    /// the prior entry in `state`.
    ///
    /// Caller contract: on `fire`, the caller must `state.record(key, value,
    /// now)` to re-arm the comparison. Recovery clearing is the threshold
    /// evaluator's job, not this function's.
    #[must_use]
    pub fn decide(&self, state: &AlertState, key: MetricKey, value: Decimal) -> Decision {
        let Some(entry) = state.entry(key) else {
            return Decision {
                fire: true,
                reason: AlertReason::FirstAlert,
            };
        };

        let prior = entry.value;
        let diff = value - prior;
        let worsening = match key.direction() {
            Direction::Low => diff < Decimal::ZERO,
            Direction::High => diff > Decimal::ZERO,
        };

        match *self {
            ReAlertPolicy::GapBased { gap } => {
                if diff.abs() < gap {
                    debug!(
                        key = %key,
                        prior = %prior,
                        current = %value,
                        gap = %gap,
                        "re-alert suppressed, change below gap"
                    );
                    return Decision {
                        fire: false,
                        reason: AlertReason::Suppressed { prior, diff },
                    };
                }
                let reason = if worsening {
                    AlertReason::Worsening { prior, diff }
                } else {
                    AlertReason::Fluctuation { prior, diff }
                };
                Decision { fire: true, reason }
            }
            ReAlertPolicy::DirectionalOnly => {
                if worsening {
                    Decision {
                        fire: true,
                        reason: AlertReason::Worsening { prior, diff },
                    }
                } else {
                    debug!(
                        key = %key,
                        prior = %prior,
                        current = %value,
                        "re-alert suppressed, not worsening"
                    );
                    Decision {
                        fire: false,
                        reason: AlertReason::Suppressed { prior, diff },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn armed(key: MetricKey, value: Decimal) -> AlertState {
        let mut state = AlertState::default();
        state.record(key, value, Utc::now());
        state
    }

    #[test]
    fn fires_first_alert_when_no_entry() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = AlertState::default();

        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-1.2));
        assert!(decision.fire);
        assert_eq!(decision.reason, AlertReason::FirstAlert);
    }

    #[test]
    fn suppresses_change_below_gap() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::UsdtLow, dec!(-1.2));

        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-1.3));
        assert!(!decision.fire);
        assert_eq!(
            decision.reason,
            AlertReason::Suppressed {
                prior: dec!(-1.2),
                diff: dec!(-0.1),
            }
        );
    }

    #[test]
    fn fires_worsening_past_gap_for_low_key() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::UsdtLow, dec!(-1.2));

        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-2.0));
        assert!(decision.fire);
        assert_eq!(
            decision.reason,
            AlertReason::Worsening {
                prior: dec!(-1.2),
                diff: dec!(-0.8),
            }
        );
    }

    #[test]
    fn fires_fluctuation_past_gap_against_direction() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::UsdtLow, dec!(-2.0));

        // Still breached (caller checked the bound), but recovering upward.
        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-1.2));
        assert!(decision.fire);
        assert_eq!(
            decision.reason,
            AlertReason::Fluctuation {
                prior: dec!(-2.0),
                diff: dec!(0.8),
            }
        );
    }

    #[test]
    fn worsening_direction_flips_for_high_keys() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::GoldHigh, dec!(11.0));

        let up = policy.decide(&state, MetricKey::GoldHigh, dec!(12.0));
        assert_eq!(
            up.reason,
            AlertReason::Worsening {
                prior: dec!(11.0),
                diff: dec!(1.0),
            }
        );

        let down = policy.decide(&state, MetricKey::GoldHigh, dec!(10.2));
        assert_eq!(
            down.reason,
            AlertReason::Fluctuation {
                prior: dec!(11.0),
                diff: dec!(-0.8),
            }
        );
    }

    #[test]
    fn change_exactly_at_gap_fires() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::UsdtLow, dec!(-1.0));

        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-1.5));
        assert!(decision.fire);
    }

    #[test]
    fn zero_gap_fires_on_any_change() {
        let policy = ReAlertPolicy::GapBased {
            gap: Decimal::ZERO,
        };
        let state = armed(MetricKey::UsdtLow, dec!(-1.0));

        // Even an identical value satisfies |diff| >= 0.
        let decision = policy.decide(&state, MetricKey::UsdtLow, dec!(-1.0));
        assert!(decision.fire);
        assert_eq!(
            decision.reason,
            AlertReason::Fluctuation {
                prior: dec!(-1.0),
                diff: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn directional_policy_fires_only_strictly_worse() {
        let policy = ReAlertPolicy::DirectionalOnly;
        let state = armed(MetricKey::UsdtLow, dec!(-1.2));

        assert!(policy.decide(&state, MetricKey::UsdtLow, dec!(-1.21)).fire);
        assert!(!policy.decide(&state, MetricKey::UsdtLow, dec!(-1.2)).fire);
        // Large non-worsening move still never fires.
        assert!(!policy.decide(&state, MetricKey::UsdtLow, dec!(-0.1)).fire);
    }

    #[test]
    fn directional_policy_still_fires_first_alert() {
        let policy = ReAlertPolicy::DirectionalOnly;
        let state = AlertState::default();

        let decision = policy.decide(&state, MetricKey::GoldHigh, dec!(12.0));
        assert!(decision.fire);
        assert_eq!(decision.reason, AlertReason::FirstAlert);
    }

    #[test]
    fn decision_is_idempotent_without_record() {
        let policy = ReAlertPolicy::GapBased { gap: dec!(0.5) };
        let state = armed(MetricKey::UsdtLow, dec!(-1.2));

        let a = policy.decide(&state, MetricKey::UsdtLow, dec!(-2.0));
        let b = policy.decide(&state, MetricKey::UsdtLow, dec!(-2.0));
        assert_eq!(a, b);
    }

    #[test]
    fn reason_strings_carry_both_values() {
        let reason = AlertReason::Worsening {
            prior: dec!(-1.2),
            diff: dec!(-0.8),
        };
        assert_eq!(reason.to_string(), "worsening: -1.2% → -2.0% (Δ-0.8%p)");
        assert_eq!(AlertReason::FirstAlert.to_string(), "first alert");
    }
}
