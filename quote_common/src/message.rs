//! Outbound message envelope written to the broker topic.
//!
//! Every published quote is serialized as
//! `{"quote": "<closing price>", "at": "<YYYY-MM-DD HH:MM:SS +0000>"}` and keyed by
//! its symbol. The price is carried as text exactly as the upstream returned it.
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// `chrono` format of the `at` field: absolute timestamp with explicit UTC offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Payload for a single (symbol, date) closing price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteMessage {
    /// Closing price as retrieved.
    pub quote: String,
    /// Observation time: midnight UTC of the quote's date.
    pub at: String,
}

impl QuoteMessage {
    /// Builds the envelope for `price` observed on `date`.
    pub fn new(price: &str, date: NaiveDate) -> Self {
        let at = date
            .and_time(NaiveTime::MIN)
            .and_utc()
            .format(TIMESTAMP_FORMAT)
            .to_string();
        QuoteMessage {
            quote: price.to_string(),
            at,
        }
    }

    /// Encode the message to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, QuoteError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_midnight_utc_with_offset() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let msg = QuoteMessage::new("101", date);
        assert_eq!(msg.at, "2020-01-02 00:00:00 +0000");
        assert_eq!(msg.quote, "101");
    }

    #[test]
    fn json_field_names_match_wire_contract() {
        let date = NaiveDate::from_ymd_opt(2018, 3, 27).unwrap();
        let bytes = QuoteMessage::new("168.34", date).to_json_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"quote":"168.34","at":"2018-03-27 00:00:00 +0000"}"#
        );
    }
}
