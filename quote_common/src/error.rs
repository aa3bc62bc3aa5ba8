//! Error types shared across the workspace.
//!
//! `ConfigError` covers the startup tier: anything wrong with the supplied
//! configuration aborts the run before any network work begins. `QuoteError`
//! unifies the remaining failures that are allowed to terminate a run.
use thiserror::Error;

/// Invalid or unusable configuration detected at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A calendar date could not be parsed with the `YYYY-MM-DD` format.
    #[error("{var}: invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Name of the environment variable (or flag) holding the value.
        var: &'static str,
        /// The raw value as supplied.
        value: String,
    },
}

/// Unified error type for the quote publishing workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Configuration rejected at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The upstream data-source client could not be set up.
    #[error("Upstream client error: {0}")]
    Upstream(String),

    /// The broker client reported an error while connecting or sending.
    #[error("Broker error: {0}")]
    Broker(String),

    /// The broker could not be reached within the configured number of attempts.
    #[error("Broker unavailable after {attempts} attempt(s): {reason}")]
    BrokerUnavailable {
        /// How many connection attempts were made.
        attempts: u32,
        /// Error reported by the last attempt.
        reason: String,
    },
}
