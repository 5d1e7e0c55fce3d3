//! Run-scoped memoized timestamp-to-date conversion.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Converts a calendar date to its UTC midnight unix timestamp.
pub fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
        .timestamp()
}

/// Memoized unix timestamp → calendar date conversion.
///
/// A run touches the same timestamps repeatedly (every ticker's quotes
/// cluster on the same trading days), so conversions are cached for the
/// lifetime of one run. Constructed per run and passed explicitly;
/// never a global.
#[derive(Debug, Default)]
pub struct DateCache {
    parsed: HashMap<i64, NaiveDate>,
}

impl DateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The UTC calendar date for a unix timestamp, cached. `None` for
    /// timestamps outside chrono's representable range; corrupt data
    /// must degrade, never panic.
    pub fn date_for(&mut self, timestamp: i64) -> Option<NaiveDate> {
        if let Some(date) = self.parsed.get(&timestamp) {
            return Some(*date);
        }
        let date = chrono::DateTime::from_timestamp(timestamp, 0)?.date_naive();
        self.parsed.insert(timestamp, date);
        Some(date)
    }

    /// Truncates a unix timestamp to the start of its UTC day. `None`
    /// when the timestamp is out of range.
    pub fn start_of_day(&mut self, timestamp: i64) -> Option<i64> {
        self.date_for(timestamp).map(day_start)
    }

    /// Number of cached conversions (for testing).
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}
