//! Durable alert state.
//!
//! One [`AlertEntry`] per [`MetricKey`]: the last value for which a
//! notification actually fired. An entry exists only while the key's
//! condition has been breached continuously since it was recorded; recovery
//! clears the whole family. Mutations are tracked so a run only writes the
//! store back when something changed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{MetricFamily, MetricKey};

/// Last-notified value for one metric key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub value: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Mapping from metric key to its last-notified entry.
///
/// Absent key = never alerted, or cleared by recovery. Serializes as the
/// bare JSON map (`{"usdt_low": {"value": ..., "timestamp": ...}}`), which
/// is the durable document format.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertState {
    entries: HashMap<MetricKey, AlertEntry>,
    #[serde(skip)]
    dirty: bool,
}

impl AlertState {
    /// State seeded with existing entries, as loaded from storage.
    #[must_use]
    pub fn from_entries(entries: HashMap<MetricKey, AlertEntry>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    #[must_use]
    pub fn entry(&self, key: MetricKey) -> Option<&AlertEntry> {
        self.entries.get(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any mutation occurred since load. Drives save-only-if-mutated.
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Overwrite the entry for `key` with the value that just fired.
    /// This is what re-arms the gap comparison for the next run.
    pub fn record(&mut self, key: MetricKey, value: Decimal, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            AlertEntry {
                value,
                timestamp: now,
            },
        );
        self.dirty = true;
    }

    /// Remove the entry for `key` if present. Clearing an absent key is not
    /// a mutation.
    pub fn clear(&mut self, key: MetricKey) -> bool {
        let removed = self.entries.remove(&key).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Remove both of a family's entries, the recovery transition.
    pub fn clear_family(&mut self, family: MetricFamily) -> bool {
        let low = self.clear(family.low_key());
        let high = self.clear(family.high_key());
        low || high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fresh_state_is_clean_and_empty() {
        let state = AlertState::default();
        assert!(state.is_empty());
        assert!(!state.dirty());
    }

    #[test]
    fn record_sets_entry_and_dirty() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::UsdtLow, dec!(-1.2), now);

        let entry = state.entry(MetricKey::UsdtLow).unwrap();
        assert_eq!(entry.value, dec!(-1.2));
        assert_eq!(entry.timestamp, now);
        assert!(state.dirty());
    }

    #[test]
    fn clearing_absent_key_is_not_a_mutation() {
        let mut state = AlertState::default();
        assert!(!state.clear(MetricKey::GoldHigh));
        assert!(!state.dirty());
    }

    #[test]
    fn clear_family_removes_both_directions() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record(MetricKey::GoldLow, dec!(-0.5), now);
        state.record(MetricKey::GoldHigh, dec!(11.0), now);

        assert!(state.clear_family(MetricFamily::Gold));
        assert!(state.entry(MetricKey::GoldLow).is_none());
        assert!(state.entry(MetricKey::GoldHigh).is_none());
    }

    #[test]
    fn loaded_state_starts_clean() {
        let mut entries = HashMap::new();
        entries.insert(
            MetricKey::UsdtLow,
            AlertEntry {
                value: dec!(-1.2),
                timestamp: Utc::now(),
            },
        );
        let state = AlertState::from_entries(entries);
        assert!(!state.dirty());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn serializes_as_bare_map() {
        let mut state = AlertState::default();
        state.record(
            MetricKey::UsdtLow,
            dec!(-1.2),
            "2026-01-15T10:30:00Z".parse().unwrap(),
        );

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.is_object());
        assert!(json.get("usdt_low").is_some());

        let back: AlertState = serde_json::from_value(json).unwrap();
        assert_eq!(back.entry(MetricKey::UsdtLow).unwrap().value, dec!(-1.2));
        assert!(!back.dirty());
    }
}
