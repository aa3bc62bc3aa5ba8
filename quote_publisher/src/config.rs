//! Validated run configuration.
//!
//! `Config` is built once from `Args` at startup and handed to each component by
//! reference; nothing below `main` reads the environment.
use std::time::Duration;

use chrono::NaiveDate;
use log::warn;
use quote_common::broker::{self, Acks};
use quote_common::symbols::{Symbol, SymbolParser};
use quote_common::ConfigError;

use crate::args::Args;
use crate::calendar::DATE_FORMAT;
use crate::publisher::RetryPolicy;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First date, inclusive.
    pub start: NaiveDate,
    /// Last date, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start <= end` is the caller's responsibility.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Returns `true` when `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Where and how quotes are downloaded.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// API root, without a trailing slash requirement.
    pub api_base: String,
    /// Database code datasets are looked up in.
    pub database: String,
    /// Credential sent with every request.
    pub api_key: String,
}

/// Where and how quotes are published.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Bootstrap hosts.
    pub hosts: Vec<String>,
    /// Destination topic.
    pub topic: String,
    /// Client id announced to the broker.
    pub client_id: String,
    /// Acknowledgement level per message.
    pub acks: Acks,
    /// How long the broker may take to acknowledge.
    pub ack_timeout: Duration,
    /// Connection retry policy.
    pub retry: RetryPolicy,
}

/// Complete configuration of one publishing run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dates to publish.
    pub range: DateRange,
    /// Symbols in configured order; this order drives publishing.
    pub symbols: Vec<Symbol>,
    /// Data source settings.
    pub upstream: UpstreamConfig,
    /// Broker settings.
    pub broker: BrokerConfig,
    /// Log messages instead of publishing them.
    pub dry_run: bool,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let start = parse_date("START_DATE", &args.start_date)?;
        let end = parse_date("END_DATE", &args.end_date)?;
        if start > end {
            warn!(
                "START_DATE {} is after END_DATE {}; no quotes will be published",
                start, end
            );
        }

        Ok(Config {
            range: DateRange::new(start, end),
            symbols: Symbol::parse_list(&args.equity_list),
            upstream: UpstreamConfig {
                api_base: args.quandl_api_base,
                database: args.quandl_database,
                api_key: args.quandl_api_key,
            },
            broker: BrokerConfig {
                hosts: broker::hosts(&args.kafka_endpoint),
                topic: args.kafka_producer_topic,
                client_id: args.kafka_client_id,
                acks: args.kafka_required_acks,
                ack_timeout: Duration::from_millis(args.kafka_ack_timeout_ms),
                retry: RetryPolicy::new(
                    args.broker_connect_attempts,
                    Duration::from_millis(args.broker_connect_backoff_ms),
                    Duration::from_millis(args.broker_connect_max_backoff_ms),
                ),
            },
            dry_run: args.dry_run,
        })
    }
}

/// Parses a `YYYY-MM-DD` value read from `var`.
pub fn parse_date(var: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        var,
        value: value.to_string(),
    })
}
