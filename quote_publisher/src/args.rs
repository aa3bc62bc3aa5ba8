//! Command-line arguments for the quote publisher.
//!
//! Every option can also be supplied through the environment variable named
//! next to it, which is how the publisher is normally deployed. See `config`
//! for the validated form.
use clap::Parser;
use quote_common::broker::{Acks, DEFAULT_ACK_TIMEOUT_MS, DEFAULT_CLIENT_ID};

use crate::fetcher::{DEFAULT_API_BASE, DEFAULT_DATABASE};

/// Parsed command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// First date to publish, inclusive (`YYYY-MM-DD`).
    #[arg(long, env = "START_DATE")]
    pub start_date: String,

    /// Last date to publish, inclusive (`YYYY-MM-DD`).
    #[arg(long, env = "END_DATE")]
    pub end_date: String,

    /// Broker address, e.g. `localhost:9092`.
    #[arg(long, env = "KAFKA_ENDPOINT")]
    pub kafka_endpoint: String,

    /// Topic the quotes are published to.
    #[arg(long, env = "KAFKA_PRODUCER_TOPIC")]
    pub kafka_producer_topic: String,

    /// Credential for the upstream data source.
    #[arg(long, env = "QUANDL_API_KEY", hide_env_values = true)]
    pub quandl_api_key: String,

    /// Comma-separated ticker symbols. Taken verbatim, no trimming.
    #[arg(long, env = "EQUITY_LIST")]
    pub equity_list: String,

    /// Root URL of the upstream REST API.
    #[arg(long, env = "QUANDL_API_BASE", default_value = DEFAULT_API_BASE)]
    pub quandl_api_base: String,

    /// Upstream database code each symbol is looked up in.
    #[arg(long, env = "QUANDL_DATABASE", default_value = DEFAULT_DATABASE)]
    pub quandl_database: String,

    /// Client id announced to the broker.
    #[arg(long, env = "KAFKA_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    pub kafka_client_id: String,

    /// Acknowledgement level for produced messages.
    #[arg(long, env = "KAFKA_REQUIRED_ACKS", value_enum, default_value_t = Acks::One)]
    pub kafka_required_acks: Acks,

    /// Milliseconds the broker may take to acknowledge a message.
    #[arg(long, env = "KAFKA_ACK_TIMEOUT_MS", default_value_t = DEFAULT_ACK_TIMEOUT_MS)]
    pub kafka_ack_timeout_ms: u64,

    /// Broker connection attempts before giving up; 0 retries forever.
    #[arg(long, env = "BROKER_CONNECT_ATTEMPTS", default_value_t = 10)]
    pub broker_connect_attempts: u32,

    /// Delay after the first failed connection attempt, doubled on each retry.
    #[arg(long, env = "BROKER_CONNECT_BACKOFF_MS", default_value_t = 500)]
    pub broker_connect_backoff_ms: u64,

    /// Upper bound for the connection retry delay.
    #[arg(long, env = "BROKER_CONNECT_MAX_BACKOFF_MS", default_value_t = 30_000)]
    pub broker_connect_max_backoff_ms: u64,

    /// Log the messages instead of sending them to the broker.
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,
}
