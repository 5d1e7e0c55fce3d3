//! Response types for the Yahoo Finance v8 chart endpoint.
//!
//! The indicator arrays run parallel to `timestamp`; individual slots can
//! be `null` on days the exchange reported no data, so every element is an
//! `Option`. Provider metadata fields we do not model explicitly are kept
//! in a flattened map so they round-trip verbatim into stored datasets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level envelope: `{"chart": {"result": [...], "error": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

/// Provider-side error block, present on failed lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// One result entry: metadata plus aligned timestamp/indicator arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
    #[serde(default)]
    pub events: Option<Events>,
}

/// Chart metadata block. Only `firstTradeDate` is interpreted; the rest
/// is carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartMeta {
    #[serde(rename = "firstTradeDate", skip_serializing_if = "Option::is_none")]
    pub first_trade_date: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicators>,
    #[serde(default)]
    pub adjclose: Vec<AdjcloseIndicators>,
}

/// Parallel OHLCV arrays; index i corresponds to `timestamp[i]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicators {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjcloseIndicators {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Sparse event annotations keyed by timestamp. The provider serializes
/// the keys as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Events {
    #[serde(default)]
    pub dividends: BTreeMap<String, DividendEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DividendEvent {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<i64>,
}

impl ChartResult {
    /// The OHLCV arrays, if the result carries any.
    pub fn quote_arrays(&self) -> Option<&QuoteIndicators> {
        self.indicators.as_ref()?.quote.first()
    }

    /// The adjusted-close array, if present.
    pub fn adjclose_array(&self) -> Option<&AdjcloseIndicators> {
        self.indicators.as_ref()?.adjclose.first()
    }

    /// Dividend amount for an exact timestamp, if an event with a numeric
    /// amount fell on it.
    pub fn dividend_amount(&self, timestamp: i64) -> Option<f64> {
        self.events
            .as_ref()?
            .dividends
            .get(&timestamp.to_string())?
            .amount
    }
}
