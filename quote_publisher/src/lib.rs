//! Historical closing-price publisher.
//!
//! Downloads the daily history of a configured list of equities, merges it into
//! a per-date table and republishes every in-range (symbol, date, close) as a
//! JSON message on a Kafka topic, keyed by symbol:
//!
//! - `config` / `args` — CLI and environment configuration.
//! - `shuffle` — randomized fetch order.
//! - `fetcher` — upstream history download and row extraction.
//! - `model` — `Quote` and the `MergeTable`.
//! - `calendar` — date filtering and ordering.
//! - `publisher` — broker sinks, connection retry and publish ordering.
//! - `pipeline` — the end-to-end `run`.
#![warn(missing_docs)]

pub mod args;
pub mod calendar;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod publisher;
pub mod shuffle;

pub use config::Config;
pub use pipeline::{RunSummary, run};
