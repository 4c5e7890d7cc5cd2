use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A single price source failing. Recovered by the fallback chain;
/// only chain exhaustion surfaces as [`Error::SourceUnavailable`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse price: {0}")]
    Parse(String),

    #[error("price {value} outside plausible range {lo}..{hi}")]
    OutOfRange {
        value: rust_decimal::Decimal,
        lo: rust_decimal::Decimal,
        hi: rust_decimal::Decimal,
    },
}

/// Durable alert-state store errors. Load failures degrade to an empty
/// state; save failures are logged and swallowed. Neither fails a run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode stored state: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected storage response: {0}")]
    Response(String),
}

/// Notification delivery errors. Logged and swallowed; a failed
/// notification never aborts state persistence or changes exit status.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("telegram delivery failed: {0}")]
    Telegram(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Every adapter for a required quantity failed. Fatal for the FX
    /// rate; per-metric inputs are skipped for the run instead.
    #[error("no source could provide {quantity}")]
    SourceUnavailable { quantity: &'static str },

    #[error("invalid input for {what}: {reason}")]
    InvalidInput { what: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
