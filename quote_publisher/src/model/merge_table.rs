//! Date-indexed table of closing prices.
//!
//! Quotes from every symbol are folded into a `date -> symbol -> price` map
//! during the fetch phase. The table is only read afterwards. A repeated
//! (date, symbol) insert overwrites the previous price.

use std::collections::HashMap;

use quote_common::Symbol;

use crate::model::quote::Quote;

/// Per-date, per-symbol closing prices collected in one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeTable {
    rows: HashMap<String, HashMap<Symbol, String>>,
}

impl MergeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `quote`, replacing any price already held for its (date, symbol).
    pub fn insert(&mut self, quote: Quote) {
        self.rows
            .entry(quote.date)
            .or_default()
            .insert(quote.symbol, quote.close);
    }

    /// Price of `symbol` on the date keyed by `date`, if one was fetched.
    pub fn lookup(&self, date: &str, symbol: &Symbol) -> Option<&str> {
        self.rows
            .get(date)
            .and_then(|prices| prices.get(symbol))
            .map(String::as_str)
    }

    /// Every distinct date key seen, in no particular order.
    pub fn date_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of (date, symbol) pairs held.
    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quote(date: &str, symbol: &str, close: &str) -> Quote {
        Quote::new(date, Symbol::new(symbol), close)
    }

    #[test]
    fn lookup_returns_inserted_price() {
        let mut table = MergeTable::new();
        table.insert(quote("2020-01-01", "AAA", "100"));
        table.insert(quote("2020-01-01", "BBB", "50"));

        assert_eq!(table.lookup("2020-01-01", &Symbol::new("AAA")), Some("100"));
        assert_eq!(table.lookup("2020-01-01", &Symbol::new("BBB")), Some("50"));
        assert_eq!(table.lookup("2020-01-02", &Symbol::new("AAA")), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn later_insert_overwrites_same_pair() {
        let mut table = MergeTable::new();
        table.insert(quote("2020-01-01", "AAA", "100"));
        table.insert(quote("2020-01-01", "AAA", "100.5"));

        assert_eq!(table.lookup("2020-01-01", &Symbol::new("AAA")), Some("100.5"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn date_keys_are_distinct() {
        let mut table = MergeTable::new();
        table.insert(quote("2020-01-01", "AAA", "100"));
        table.insert(quote("2020-01-01", "BBB", "50"));
        table.insert(quote("2020-01-02", "AAA", "101"));

        let mut keys: Vec<&str> = table.date_keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["2020-01-01", "2020-01-02"]);
    }

    proptest! {
        #[test]
        fn inserting_twice_equals_inserting_once(
            quotes in prop::collection::vec(("[0-9]{4}-0[1-9]-[12][0-9]", "[A-Z]{1,4}", "[0-9]{1,3}\\.[0-9]{2}"), 0..20)
        ) {
            let mut once = MergeTable::new();
            let mut twice = MergeTable::new();
            for (date, symbol, close) in &quotes {
                once.insert(quote(date, symbol, close));
                twice.insert(quote(date, symbol, close));
                twice.insert(quote(date, symbol, close));
            }
            prop_assert_eq!(once, twice);
        }
    }
}
