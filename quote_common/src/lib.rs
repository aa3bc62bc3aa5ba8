//!
//! Common types and utilities shared by the quote publishing crates.
//!
//! This crate aggregates:
//! - `error` — `ConfigError` and the unified `QuoteError`.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `symbols` — ticker symbols and symbol-list parsing.
//! - `message` — the JSON envelope written to the broker topic.
//! - `broker` — broker-facing constants and acknowledgement modes.
#![warn(missing_docs)]
pub mod broker;
pub mod error;
pub mod message;
pub mod result;
pub mod symbols;

pub use error::{ConfigError, QuoteError};
pub use message::QuoteMessage;
pub use result::Result;
pub use symbols::Symbol;
