//! Date filtering and ordering of the merged table.

use chrono::NaiveDate;
use log::{error, info};

use crate::config::DateRange;
use crate::model::merge_table::MergeTable;

/// Calendar date format used for configuration and upstream date keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A trading date retained for publishing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionDate {
    /// Parsed calendar date.
    pub date: NaiveDate,
    /// Key the date is stored under in the merge table.
    pub key: String,
}

/// Dates of `table` that fall inside `range`, ascending.
///
/// Keys that do not parse as `YYYY-MM-DD` are logged and dropped.
pub fn sessions_in_range(table: &MergeTable, range: &DateRange) -> Vec<SessionDate> {
    let mut sessions: Vec<SessionDate> = table
        .date_keys()
        .filter_map(|key| match NaiveDate::parse_from_str(key, DATE_FORMAT) {
            Ok(date) => Some(SessionDate {
                date,
                key: key.to_string(),
            }),
            Err(e) => {
                error!("Dropping unparsable date '{}': {}", key, e);
                None
            }
        })
        .filter(|session| range.contains(session.date))
        .collect();

    sessions.sort_unstable_by_key(|session| session.date);
    info!(
        "{} date(s) between {} and {}",
        sessions.len(),
        range.start,
        range.end
    );
    sessions
}
