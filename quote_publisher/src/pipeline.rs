//! One publishing run: shuffle, fetch, filter, publish.
//!
//! Each phase completes before the next starts. The broker connection is only
//! acquired once the dates to publish are known.

use log::info;
use quote_common::Result;

use crate::calendar::sessions_in_range;
use crate::config::Config;
use crate::fetcher::{QuoteSource, fetch_all};
use crate::model::merge_table::MergeTable;
use crate::publisher::{QuoteSink, connect_with_retry, publish_all};
use crate::shuffle::shuffle_symbols;

/// What a run did, for the final log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Symbols downloaded successfully.
    pub symbols_fetched: usize,
    /// Symbols whose download failed.
    pub symbols_failed: usize,
    /// Quotes merged into the table.
    pub rows_merged: usize,
    /// Distinct dates inside the configured range.
    pub dates_in_range: usize,
    /// Messages accepted by the sink.
    pub published: usize,
    /// (date, symbol) pairs with no quote.
    pub skipped_missing: usize,
    /// Messages that could not be encoded or sent.
    pub failed: usize,
}

/// Run the whole pipeline against `source`, publishing through the sink
/// returned by `connect`.
///
/// Per-symbol, per-date and per-message failures are logged and skipped. Only
/// failing to acquire the sink within `config.broker.retry` is returned.
pub fn run<S, K, F>(config: &Config, source: &S, connect: F) -> Result<RunSummary>
where
    S: QuoteSource + ?Sized,
    K: QuoteSink,
    F: FnMut() -> Result<K>,
{
    let mut fetch_order = config.symbols.clone();
    shuffle_symbols(&mut fetch_order);

    let mut table = MergeTable::new();
    let fetched = fetch_all(source, &fetch_order, &mut table);
    info!(
        "Fetched {} symbol(s), {} failed, {} quote(s) merged",
        fetched.fetched,
        fetched.failed.len(),
        fetched.rows_merged
    );

    let sessions = sessions_in_range(&table, &config.range);

    let mut sink = connect_with_retry(&config.broker.retry, connect)?;
    let published = publish_all(
        &mut sink,
        &config.broker.topic,
        &table,
        &sessions,
        &config.symbols,
    );

    Ok(RunSummary {
        symbols_fetched: fetched.fetched,
        symbols_failed: fetched.failed.len(),
        rows_merged: fetched.rows_merged,
        dates_in_range: sessions.len(),
        published: published.published,
        skipped_missing: published.skipped_missing,
        failed: published.failed,
    })
}
