//! In-memory data model of a publishing run.
//!
//! - `quote` — a single (date, symbol, closing price) observation.
//! - `merge_table` — per-date view of every quote fetched during the run.

pub mod merge_table;
pub mod quote;
