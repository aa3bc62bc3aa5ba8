//! Ticker symbols and helpers for reading the configured symbol list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the `EQUITY_LIST` setting.
pub const LIST_SEPARATOR: char = ',';

/// Trait providing parsing of a delimited symbol list.
pub trait SymbolParser: Sized {
    /// Splits `raw` on commas, one symbol per field.
    ///
    /// Fields are taken verbatim: no whitespace trimming, no deduplication and
    /// empty fields are kept. The caller is expected to supply a clean list.
    fn parse_list(raw: &str) -> Vec<Self>;
}

/// Opaque ticker identifier as understood by the upstream data source.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Symbol(value.into())
    }

    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SymbolParser for Symbol {
    fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(LIST_SEPARATOR).map(Symbol::new).collect()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_in_order() {
        let symbols = Symbol::parse_list("AAPL,MSFT,GOOGL");
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn keeps_whitespace_and_duplicates() {
        let symbols = Symbol::parse_list("AAPL, MSFT,AAPL");
        assert_eq!(
            symbols,
            vec![Symbol::new("AAPL"), Symbol::new(" MSFT"), Symbol::new("AAPL")]
        );
    }

    #[test]
    fn empty_input_yields_single_empty_symbol() {
        assert_eq!(Symbol::parse_list(""), vec![Symbol::new("")]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Symbol::new("IBM")).unwrap();
        assert_eq!(json, "\"IBM\"");
    }
}
