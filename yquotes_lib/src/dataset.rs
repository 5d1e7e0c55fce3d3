//! Persisted per-ticker dataset shape.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's data for a ticker.
///
/// `open` is always present: days the provider reports without an open
/// price are dropped during merge rather than stored as gaps. The other
/// indicator slots can be null in the provider response and are kept as
/// they arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub timestamp: i64,
    pub date: NaiveDate,
    pub open: f64,
    pub close: Option<f64>,
    pub adjclose: Option<f64>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividends_amount: Option<f64>,
}

/// Provider metadata carried with a dataset.
///
/// `firstTradeDate` is the only field the engine interprets; everything
/// else the provider sent is preserved verbatim in `extra`. `dividends`
/// is added by the merge step: true iff any stored quote carries a
/// dividend amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(rename = "firstTradeDate", default, skip_serializing_if = "Option::is_none")]
    pub first_trade_date: Option<i64>,
    #[serde(default)]
    pub dividends: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The persisted unit for one ticker.
///
/// `quote` is keyed by unix timestamp in ascending order, matching the
/// order the provider returns. The map is replaced wholesale on every
/// successful fetch; quotes outside the fetched window do not survive.
/// `last_updated` is the high-water mark consulted by the window
/// calculator on the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerDataset {
    pub meta: DatasetMeta,
    #[serde(default)]
    pub quote: BTreeMap<i64, QuoteRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

impl TickerDataset {
    /// The lowest-timestamp quote, if any.
    pub fn first_quote(&self) -> Option<&QuoteRecord> {
        self.quote.values().next()
    }
}
