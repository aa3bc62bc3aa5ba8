//! Quote publisher binary.
//!
//! Reads its configuration from the environment (or the equivalent flags),
//! downloads the configured equities' history and publishes each in-range close
//! to the configured Kafka topic.
//!
//! Usage example:
//! ```bash
//! START_DATE=2018-01-01 END_DATE=2018-03-27 \
//! KAFKA_ENDPOINT=localhost:9092 KAFKA_PRODUCER_TOPIC=quotes \
//! QUANDL_API_KEY=... EQUITY_LIST=AAPL,MSFT,GOOGL quote_publisher
//! ```
#![warn(missing_docs)]
use clap::Parser;
use log::{error, info};
use quote_common::{QuoteError, Result};
use quote_publisher::args::Args;
use quote_publisher::fetcher::QuandlSource;
use quote_publisher::publisher::{KafkaSink, LogSink};
use quote_publisher::{Config, run};

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let config = Config::try_from(args).map_err(|e| {
        error!("{}", e);
        QuoteError::from(e)
    })?;
    info!(
        "Publishing {} symbol(s) from {} to {} on topic {}",
        config.symbols.len(),
        config.range.start,
        config.range.end,
        config.broker.topic
    );

    let source = QuandlSource::new(&config.upstream)
        .map_err(|e| QuoteError::Upstream(e.to_string()))?;

    let summary = if config.dry_run {
        run(&config, &source, || Ok(LogSink))?
    } else {
        run(&config, &source, || KafkaSink::connect(&config.broker))?
    };

    info!(
        "Done: {} published, {} missing, {} failed; {} of {} symbol(s) fetched over {} date(s)",
        summary.published,
        summary.skipped_missing,
        summary.failed,
        summary.symbols_fetched,
        summary.symbols_fetched + summary.symbols_failed,
        summary.dates_in_range
    );
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
