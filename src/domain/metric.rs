//! Metric identities.
//!
//! A [`MetricFamily`] is one monitored asset class; a [`MetricKey`] binds a
//! family to one breach direction and is the unit of alert state.

use serde::{Deserialize, Serialize};

/// One of the two monitored asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Usdt,
    Gold,
}

impl MetricFamily {
    /// Key for this family's low-bound breach.
    #[must_use]
    pub fn low_key(self) -> MetricKey {
        match self {
            MetricFamily::Usdt => MetricKey::UsdtLow,
            MetricFamily::Gold => MetricKey::GoldLow,
        }
    }

    /// Key for this family's high-bound breach.
    #[must_use]
    pub fn high_key(self) -> MetricKey {
        match self {
            MetricFamily::Usdt => MetricKey::UsdtHigh,
            MetricFamily::Gold => MetricKey::GoldHigh,
        }
    }
}

impl std::fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricFamily::Usdt => write!(f, "usdt"),
            MetricFamily::Gold => write!(f, "gold"),
        }
    }
}

/// Which side of the normal range a key watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Breached when the value falls to or below the low bound.
    /// Worsens as the value moves further down.
    Low,
    /// Breached when the value rises to or above the high bound.
    /// Worsens as the value moves further up.
    High,
}

/// A monitored quantity-direction pair.
///
/// `UsdtHigh` is a legacy variant from an earlier two-sided USDT
/// configuration; it is only evaluated when `thresholds.usdt_high` is set,
/// but always round-trips through stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    UsdtLow,
    UsdtHigh,
    GoldLow,
    GoldHigh,
}

impl MetricKey {
    #[must_use]
    pub fn family(self) -> MetricFamily {
        match self {
            MetricKey::UsdtLow | MetricKey::UsdtHigh => MetricFamily::Usdt,
            MetricKey::GoldLow | MetricKey::GoldHigh => MetricFamily::Gold,
        }
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            MetricKey::UsdtLow | MetricKey::GoldLow => Direction::Low,
            MetricKey::UsdtHigh | MetricKey::GoldHigh => Direction::High,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::UsdtLow => "usdt_low",
            MetricKey::UsdtHigh => "usdt_high",
            MetricKey::GoldLow => "gold_low",
            MetricKey::GoldHigh => "gold_high",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
