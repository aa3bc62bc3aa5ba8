//! Publishing quotes to the broker topic.
//!
//! The publisher first acquires a sink with `connect_with_retry`, then walks the
//! retained dates in ascending order and, for each date, the symbols in their
//! configured order. Every (date, symbol) pair present in the merge table is
//! sent as one `QuoteMessage` keyed by the symbol. Missing pairs are skipped
//! silently; a message that cannot be encoded or sent is logged and skipped.
//!
//! The Kafka connection is owned by `KafkaSink` and released when the sink is
//! dropped, whichever way the run ends.
use std::thread;
use std::time::Duration;

use kafka::producer::{Producer, Record, RequiredAcks};
use log::{debug, error, info, warn};
use quote_common::broker::Acks;
use quote_common::{QuoteError, QuoteMessage, Result, Symbol};

use crate::calendar::SessionDate;
use crate::config::BrokerConfig;
use crate::model::merge_table::MergeTable;

/// Destination for encoded quote messages.
pub trait QuoteSink {
    /// Synchronously deliver one message to `topic`, keyed by `key`.
    fn send(&mut self, topic: &str, key: &str, payload: &[u8]) -> Result<()>;
}

/// Bounded exponential backoff for acquiring the broker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before giving up; `0` never gives up.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_delay: Duration,
    /// Ceiling for any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy giving up after `max_attempts` (`0` for never).
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_delay)
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts != 0 && attempt >= self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(500), Duration::from_secs(30))
    }
}

/// Call `connect` until it succeeds or `policy` runs out of attempts.
pub fn connect_with_retry<S, F>(policy: &RetryPolicy, mut connect: F) -> Result<S>
where
    F: FnMut() -> Result<S>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match connect() {
            Ok(sink) => {
                if attempt > 1 {
                    info!("Broker connection established after {} attempts", attempt);
                }
                return Ok(sink);
            }
            Err(e) if policy.exhausted(attempt) => {
                error!("Giving up on broker after {} attempt(s): {}", attempt, e);
                return Err(QuoteError::BrokerUnavailable {
                    attempts: attempt,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Broker connection attempt {} failed: {}. Retrying in {:?}",
                    attempt, e, delay
                );
                thread::sleep(delay);
            }
        }
    }
}

/// Counters for the publish phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Messages accepted by the sink.
    pub published: usize,
    /// (date, symbol) pairs with no quote.
    pub skipped_missing: usize,
    /// Messages that could not be encoded or sent.
    pub failed: usize,
}

/// Publish every quote of `table` for `sessions` to `topic`.
///
/// `sessions` must already be ascending; `symbols` is the configured order.
pub fn publish_all<K: QuoteSink + ?Sized>(
    sink: &mut K,
    topic: &str,
    table: &MergeTable,
    sessions: &[SessionDate],
    symbols: &[Symbol],
) -> PublishReport {
    let mut report = PublishReport::default();

    for session in sessions {
        for symbol in symbols {
            let price = match table.lookup(&session.key, symbol) {
                Some(price) if !price.is_empty() => price,
                _ => {
                    report.skipped_missing += 1;
                    continue;
                }
            };

            let payload = match QuoteMessage::new(price, session.date).to_json_bytes() {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode {} on {}: {}", symbol, session.key, e);
                    report.failed += 1;
                    continue;
                }
            };

            match sink.send(topic, symbol.as_str(), &payload) {
                Ok(()) => {
                    debug!("Published {} on {}: {}", symbol, session.key, price);
                    report.published += 1;
                }
                Err(e) => {
                    error!("Failed to publish {} on {}: {}", symbol, session.key, e);
                    report.failed += 1;
                }
            }
        }
    }
    report
}

fn required_acks(acks: Acks) -> RequiredAcks {
    match acks {
        Acks::None => RequiredAcks::None,
        Acks::One => RequiredAcks::One,
        Acks::All => RequiredAcks::All,
    }
}

/// Synchronous Kafka producer.
pub struct KafkaSink {
    producer: Producer,
    hosts: Vec<String>,
}

impl KafkaSink {
    /// Open a producer against `config.hosts`. One attempt, no retry.
    pub fn connect(config: &BrokerConfig) -> Result<Self> {
        let producer = Producer::from_hosts(config.hosts.clone())
            .with_client_id(config.client_id.clone())
            .with_ack_timeout(config.ack_timeout)
            .with_required_acks(required_acks(config.acks))
            .create()
            .map_err(|e| QuoteError::Broker(e.to_string()))?;

        info!("Connected to broker {}", config.hosts.join(","));
        Ok(Self {
            producer,
            hosts: config.hosts.clone(),
        })
    }
}

impl QuoteSink for KafkaSink {
    fn send(&mut self, topic: &str, key: &str, payload: &[u8]) -> Result<()> {
        self.producer
            .send(&Record::from_key_value(topic, key, payload))
            .map_err(|e| QuoteError::Broker(e.to_string()))
    }
}

impl Drop for KafkaSink {
    fn drop(&mut self) {
        info!("Releasing broker connection to {}", self.hosts.join(","));
    }
}

/// Sink that only logs what would have been published.
#[derive(Debug, Default)]
pub struct LogSink;

impl QuoteSink for LogSink {
    fn send(&mut self, topic: &str, key: &str, payload: &[u8]) -> Result<()> {
        info!(
            "[dry-run] {} <{}> {}",
            topic,
            key,
            String::from_utf8_lossy(payload)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::Quote;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<(String, String, String)>,
        reject_key: Option<String>,
    }

    impl QuoteSink for RecordingSink {
        fn send(&mut self, topic: &str, key: &str, payload: &[u8]) -> Result<()> {
            if self.reject_key.as_deref() == Some(key) {
                return Err(QuoteError::Broker("message too large".into()));
            }
            self.sent.push((
                topic.to_string(),
                key.to_string(),
                String::from_utf8(payload.to_vec()).unwrap(),
            ));
            Ok(())
        }
    }

    fn session(key: &str) -> SessionDate {
        SessionDate {
            date: NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap(),
            key: key.to_string(),
        }
    }

    fn zero_delay(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = RetryPolicy::new(0, Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(policy.delay_after(4), Duration::from_millis(500));
        assert_eq!(policy.delay_after(100), Duration::from_millis(500));
    }

    #[test]
    fn connect_retries_until_success() {
        let mut calls = 0;
        let sink = connect_with_retry(&zero_delay(5), || {
            calls += 1;
            if calls < 3 {
                Err(QuoteError::Broker("connection refused".into()))
            } else {
                Ok(RecordingSink::default())
            }
        });
        assert!(sink.is_ok());
        assert_eq!(calls, 3);
    }

    #[test]
    fn connect_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<RecordingSink> = connect_with_retry(&zero_delay(4), || {
            calls += 1;
            Err(QuoteError::Broker("connection refused".into()))
        });
        match result {
            Err(QuoteError::BrokerUnavailable { attempts, reason }) => {
                assert_eq!(attempts, 4);
                assert!(reason.contains("connection refused"));
            }
            _ => panic!("expected BrokerUnavailable"),
        }
        assert_eq!(calls, 4);
    }

    #[test]
    fn zero_max_attempts_keeps_trying() {
        let mut calls = 0;
        let sink = connect_with_retry(&zero_delay(0), || {
            calls += 1;
            if calls < 50 {
                Err(QuoteError::Broker("connection refused".into()))
            } else {
                Ok(RecordingSink::default())
            }
        });
        assert!(sink.is_ok());
        assert_eq!(calls, 50);
    }

    #[test]
    fn publishes_by_date_then_configured_symbol_order() {
        let mut table = MergeTable::new();
        table.insert(Quote::new("2020-01-02", Symbol::new("BBB"), "51"));
        table.insert(Quote::new("2020-01-01", Symbol::new("BBB"), "50"));
        table.insert(Quote::new("2020-01-01", Symbol::new("AAA"), "100"));
        let symbols = vec![Symbol::new("AAA"), Symbol::new("BBB")];
        let sessions = vec![session("2020-01-01"), session("2020-01-02")];
        let mut sink = RecordingSink::default();

        let report = publish_all(&mut sink, "quotes", &table, &sessions, &symbols);

        let keys: Vec<(&str, &str)> = sink
            .sent
            .iter()
            .map(|(_, key, payload)| (key.as_str(), payload.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("AAA", r#"{"quote":"100","at":"2020-01-01 00:00:00 +0000"}"#),
                ("BBB", r#"{"quote":"50","at":"2020-01-01 00:00:00 +0000"}"#),
                ("BBB", r#"{"quote":"51","at":"2020-01-02 00:00:00 +0000"}"#),
            ]
        );
        assert!(sink.sent.iter().all(|(topic, _, _)| topic == "quotes"));
        assert_eq!(report.published, 3);
        assert_eq!(report.skipped_missing, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn send_failure_skips_only_that_message() {
        let mut table = MergeTable::new();
        table.insert(Quote::new("2020-01-01", Symbol::new("AAA"), "100"));
        table.insert(Quote::new("2020-01-01", Symbol::new("BBB"), "50"));
        let symbols = vec![Symbol::new("AAA"), Symbol::new("BBB")];
        let mut sink = RecordingSink {
            reject_key: Some("AAA".to_string()),
            ..Default::default()
        };

        let report = publish_all(&mut sink, "quotes", &table, &[session("2020-01-01")], &symbols);

        assert_eq!(report.failed, 1);
        assert_eq!(report.published, 1);
        assert_eq!(sink.sent.len(), 1);
        assert_eq!(sink.sent[0].1, "BBB");
    }

    #[test]
    fn empty_price_is_treated_as_missing() {
        let mut table = MergeTable::new();
        table.insert(Quote::new("2020-01-01", Symbol::new("AAA"), ""));
        let mut sink = RecordingSink::default();

        let report = publish_all(
            &mut sink,
            "quotes",
            &table,
            &[session("2020-01-01")],
            &[Symbol::new("AAA")],
        );

        assert!(sink.sent.is_empty());
        assert_eq!(report.skipped_missing, 1);
    }

    #[test]
    fn dry_run_sink_accepts_every_message() {
        let mut table = MergeTable::new();
        table.insert(Quote::new("2020-01-01", Symbol::new("AAA"), "100"));
        table.insert(Quote::new("2020-01-01", Symbol::new("BBB"), "50"));
        let mut sink = LogSink;

        assert!(sink.send("quotes", "AAA", br#"{"quote":"100"}"#).is_ok());

        let report = publish_all(
            &mut sink,
            "quotes",
            &table,
            &[session("2020-01-01")],
            &[Symbol::new("AAA"), Symbol::new("BBB")],
        );
        assert_eq!(report.published, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn maps_acknowledgement_levels() {
        assert!(matches!(required_acks(Acks::None), RequiredAcks::None));
        assert!(matches!(required_acks(Acks::One), RequiredAcks::One));
        assert!(matches!(required_acks(Acks::All), RequiredAcks::All));
    }
}
