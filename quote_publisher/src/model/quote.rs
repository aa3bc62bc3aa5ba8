//! Closing-price observation extracted from an upstream history row.

use quote_common::Symbol;

/// One closing price for one symbol on one date.
///
/// Both `date` and `close` are kept as the upstream's text: the date is only
/// parsed when the merge table is filtered, and the price is never parsed so it
/// is republished without rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Upstream date key, normally `YYYY-MM-DD`.
    pub date: String,
    /// Symbol the quote was fetched for.
    pub symbol: Symbol,
    /// Closing price exactly as retrieved.
    pub close: String,
}

impl Quote {
    /// Build a quote from its three parts.
    pub fn new(date: impl Into<String>, symbol: Symbol, close: impl Into<String>) -> Self {
        Quote {
            date: date.into(),
            symbol,
            close: close.into(),
        }
    }
}
