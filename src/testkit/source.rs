//! Scripted price sources.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::FetchError;
use crate::market::PriceSource;

/// [`PriceSource`] returning a fixed outcome, ignoring the HTTP client.
pub struct ScriptedSource {
    name: &'static str,
    outcome: Result<Decimal, String>,
}

impl ScriptedSource {
    /// Source that always yields `price`.
    #[must_use]
    pub fn ok(name: &'static str, price: Decimal) -> Self {
        Self {
            name,
            outcome: Ok(price),
        }
    }

    /// Source that always fails with a parse error.
    #[must_use]
    pub fn failing(name: &'static str, message: &str) -> Self {
        Self {
            name,
            outcome: Err(message.to_string()),
        }
    }

    /// Boxed chain of one successful source, the common case.
    #[must_use]
    pub fn chain_ok(name: &'static str, price: Decimal) -> Vec<Box<dyn PriceSource>> {
        vec![Box::new(Self::ok(name, price))]
    }

    /// Boxed chain of one failing source.
    #[must_use]
    pub fn chain_failing(name: &'static str, message: &str) -> Vec<Box<dyn PriceSource>> {
        vec![Box::new(Self::failing(name, message))]
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _client: &reqwest::Client) -> Result<Decimal, FetchError> {
        match &self.outcome {
            Ok(price) => Ok(*price),
            Err(message) => Err(FetchError::Parse(message.clone())),
        }
    }
}
