//! Exchange-agnostic domain types: metric identities and premium math.

mod metric;
mod premium;

pub use metric::{Direction, MetricFamily, MetricKey};
pub use premium::{gold_premium, usdt_premium, GoldPremium, TROY_OUNCE_GRAMS};
