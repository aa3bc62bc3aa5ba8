//! Historical quote download.
//!
//! For each symbol the complete daily history is requested from the upstream
//! (Quandl-style REST API, `datasets/<database>/<symbol>.json`), and each row's
//! date (column 0) and closing price (column 4) are folded into the
//! `MergeTable`. No date filtering happens here.
//!
//! A failure for one symbol is logged and the symbol is left out of the run;
//! the remaining symbols are still fetched.

use log::{debug, error, info, warn};
use quote_common::Symbol;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::model::merge_table::MergeTable;
use crate::model::quote::Quote;

/// Default root of the upstream REST API.
pub const DEFAULT_API_BASE: &str = "https://www.quandl.com/api/v3";
/// Default database code; symbol `X` is fetched as dataset `WIKI/X`.
pub const DEFAULT_DATABASE: &str = "WIKI";
/// Position of the date in every history row.
pub const DATE_COLUMN: usize = 0;
/// Position of the closing price in every history row.
pub const CLOSE_COLUMN: usize = 4;

const DATE_COLUMN_NAME: &str = "Date";
const CLOSE_COLUMN_NAME: &str = "Close";

/// One upstream history row: a fixed-width tuple of JSON values.
pub type HistoryRow = Vec<Value>;

/// Per-symbol download failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without an API error body.
    #[error("HTTP {status} for {symbol}")]
    Status {
        /// Symbol requested.
        symbol: String,
        /// HTTP status code.
        status: u16,
    },

    /// Error object returned by the API.
    #[error("upstream error {code}: {message}")]
    Upstream {
        /// API error code, e.g. `QECx02`.
        code: String,
        /// API error message.
        message: String,
    },

    /// Body could not be decoded as a dataset.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Named columns do not put the date and close where expected.
    #[error("unexpected columns: date column is '{date}', close column is '{close}'")]
    SchemaMismatch {
        /// Name found at the date position.
        date: String,
        /// Name found at the close position.
        close: String,
    },
}

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    column_names: Option<Vec<String>>,
    #[serde(default)]
    data: Vec<HistoryRow>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    quandl_error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Source of complete daily history for a symbol.
pub trait QuoteSource {
    /// All rows the source holds for `symbol`, in the source's own order.
    fn history(&self, symbol: &Symbol) -> Result<Vec<HistoryRow>, FetchError>;
}

/// Outcome of the fetch phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Symbols downloaded successfully.
    pub fetched: usize,
    /// Symbols whose download failed, in fetch order.
    pub failed: Vec<Symbol>,
    /// Rows merged into the table.
    pub rows_merged: usize,
    /// Rows dropped for a missing date or close.
    pub rows_skipped: usize,
}

/// HTTP client for the Quandl dataset API.
pub struct QuandlSource {
    client: Client,
    api_base: String,
    database: String,
    api_key: String,
}

impl QuandlSource {
    /// Build a client for the API root, database and key in `config`.
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the dataset URL for a symbol.
    fn dataset_url(&self, symbol: &Symbol) -> String {
        format!("{}/datasets/{}/{}.json", self.api_base, self.database, symbol)
    }
}

impl QuoteSource for QuandlSource {
    fn history(&self, symbol: &Symbol) -> Result<Vec<HistoryRow>, FetchError> {
        let resp = self
            .client
            .get(self.dataset_url(symbol))
            .query(&[("api_key", self.api_key.as_str())])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        read_response(status, &body, symbol)
    }
}

/// Turn an HTTP status and body into rows, or the matching per-symbol error.
///
/// A failed response carrying the upstream's `quandl_error` object becomes
/// `FetchError::Upstream`; any other failed response becomes `FetchError::Status`.
pub fn read_response(
    status: StatusCode,
    body: &str,
    symbol: &Symbol,
) -> Result<Vec<HistoryRow>, FetchError> {
    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
            return Err(FetchError::Upstream {
                code: err.quandl_error.code,
                message: err.quandl_error.message,
            });
        }
        return Err(FetchError::Status {
            symbol: symbol.to_string(),
            status: status.as_u16(),
        });
    }

    parse_dataset(body)
}

/// Parse a dataset response body into its rows.
///
/// When the body names its columns, the date and close positions are checked
/// against them; a body without column names is trusted positionally.
pub fn parse_dataset(body: &str) -> Result<Vec<HistoryRow>, FetchError> {
    let resp: DatasetResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(columns) = &resp.dataset.column_names {
        check_columns(columns)?;
    }
    Ok(resp.dataset.data)
}

fn check_columns(columns: &[String]) -> Result<(), FetchError> {
    let name = |i: usize| columns.get(i).map(String::as_str).unwrap_or("");
    let date = name(DATE_COLUMN);
    let close = name(CLOSE_COLUMN);

    if date.eq_ignore_ascii_case(DATE_COLUMN_NAME) && close.eq_ignore_ascii_case(CLOSE_COLUMN_NAME)
    {
        Ok(())
    } else {
        Err(FetchError::SchemaMismatch {
            date: date.to_string(),
            close: close.to_string(),
        })
    }
}

/// Text of a cell as the upstream wrote it; `None` for a null or absent cell.
fn cell_text(row: &HistoryRow, index: usize) -> Option<String> {
    match row.get(index)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract the (date, close) quote carried by `row` for `symbol`.
pub fn extract_quote(symbol: &Symbol, row: &HistoryRow) -> Option<Quote> {
    let date = cell_text(row, DATE_COLUMN)?;
    let close = cell_text(row, CLOSE_COLUMN)?;
    Some(Quote::new(date, symbol.clone(), close))
}

/// Download every symbol in `symbols` order and merge the quotes into `table`.
pub fn fetch_all<S: QuoteSource + ?Sized>(
    source: &S,
    symbols: &[Symbol],
    table: &mut MergeTable,
) -> FetchReport {
    let mut report = FetchReport::default();

    for symbol in symbols {
        info!("Downloading data for: {}", symbol);
        let rows = match source.history(symbol) {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to download {}: {}", symbol, e);
                report.failed.push(symbol.clone());
                continue;
            }
        };

        if rows.is_empty() {
            warn!("No history returned for {}", symbol);
        }
        for row in &rows {
            match extract_quote(symbol, row) {
                Some(quote) => {
                    table.insert(quote);
                    report.rows_merged += 1;
                }
                None => {
                    debug!("Skipping incomplete row for {}: {:?}", symbol, row);
                    report.rows_skipped += 1;
                }
            }
        }
        report.fetched += 1;
    }
    report
}
