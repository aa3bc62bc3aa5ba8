//! Broker-facing constants and helpers shared by publisher components.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Client id announced to the broker unless overridden.
pub const DEFAULT_CLIENT_ID: &str = "quote-publisher";
/// Time the broker may take to acknowledge a produce request.
pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 1000;

/// Acknowledgement level requested for every produced message.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[value(rename_all = "lower")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Acks {
    /// Fire and forget.
    None,
    /// Wait for the partition leader.
    #[default]
    One,
    /// Wait for all in-sync replicas.
    All,
}

/// Bootstrap host list for a single configured broker endpoint.
pub fn hosts(endpoint: &str) -> Vec<String> {
    vec![endpoint.to_string()]
}
