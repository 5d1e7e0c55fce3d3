//! Folding a provider chart response into a stored dataset.

use std::collections::BTreeMap;

use yquotes_api::types::ChartResult;

use crate::calendar::DateCache;
use crate::dataset::{DatasetMeta, QuoteRecord, TickerDataset};

/// Builds a fresh [`TickerDataset`] from a chart result.
///
/// The result's window becomes the entire `quote` map; nothing from a
/// previously stored dataset is carried over. Days without an open
/// price are data gaps and emit no record, but still advance
/// `last_updated`: the high-water mark tracks the last timestamp the
/// provider reported, not the last record kept.
pub fn merge_chart(result: &ChartResult, dates: &mut DateCache) -> TickerDataset {
    let mut meta = DatasetMeta::default();
    if let Some(chart_meta) = &result.meta {
        meta.first_trade_date = chart_meta.first_trade_date;
        meta.extra = chart_meta.extra.clone();
    }
    meta.dividends = false;

    let mut dataset = TickerDataset {
        meta,
        quote: BTreeMap::new(),
        last_updated: None,
    };

    let (timestamps, quotes) = match (result.timestamp.as_ref(), result.quote_arrays()) {
        (Some(timestamps), Some(quotes)) => (timestamps, quotes),
        // No trading data in the window (public holiday, brand-new
        // listing): meta-only dataset, nothing to persist.
        _ => return dataset,
    };

    let adjclose = result.adjclose_array();

    for (index, &timestamp) in timestamps.iter().enumerate() {
        // An out-of-range timestamp cannot become a record; the row is
        // dropped like any other data gap.
        let date = match dates.date_for(timestamp) {
            Some(date) => date,
            None => continue,
        };

        let open = quotes.open.get(index).copied().flatten();
        if let Some(open) = open.filter(|value| *value != 0.0) {
            let mut record = QuoteRecord {
                timestamp,
                date,
                open,
                close: quotes.close.get(index).copied().flatten(),
                adjclose: adjclose.and_then(|a| a.adjclose.get(index).copied().flatten()),
                low: quotes.low.get(index).copied().flatten(),
                high: quotes.high.get(index).copied().flatten(),
                volume: quotes.volume.get(index).copied().flatten(),
                dividends_amount: None,
            };

            if let Some(amount) = result.dividend_amount(timestamp) {
                record.dividends_amount = Some(amount);
                dataset.meta.dividends = true;
            }

            dataset.quote.insert(timestamp, record);
        }
    }

    dataset.last_updated = timestamps.last().copied();

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: serde_json::Value) -> ChartResult {
        serde_json::from_value(json).unwrap()
    }

    fn two_day_chart() -> ChartResult {
        chart(serde_json::json!({
            "meta": { "firstTradeDate": 100, "currency": "AUD" },
            "timestamp": [100, 200],
            "indicators": {
                "quote": [{
                    "open": [1.0, 1.1],
                    "close": [1.05, 1.2],
                    "low": [0.95, 1.05],
                    "high": [1.1, 1.25],
                    "volume": [10000, 12000]
                }],
                "adjclose": [{ "adjclose": [1.04, 1.19] }]
            }
        }))
    }

    #[test]
    fn builds_records_for_each_day() {
        let mut dates = DateCache::new();
        let dataset = merge_chart(&two_day_chart(), &mut dates);

        assert_eq!(dataset.quote.len(), 2);
        assert_eq!(dataset.last_updated, Some(200));
        assert!(!dataset.meta.dividends);
        assert_eq!(dataset.meta.first_trade_date, Some(100));
        assert_eq!(dataset.meta.extra["currency"], "AUD");

        let first = &dataset.quote[&100];
        assert_eq!(first.open, 1.0);
        assert_eq!(first.close, Some(1.05));
        assert_eq!(first.adjclose, Some(1.04));
        assert_eq!(first.volume, Some(10_000));
        assert_eq!(first.date.to_string(), "1970-01-01");
    }

    #[test]
    fn dividend_event_flags_record_and_meta() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "meta": { "firstTradeDate": 100 },
            "timestamp": [100, 200],
            "indicators": {
                "quote": [{
                    "open": [1.0, 1.1],
                    "close": [1.05, 1.2],
                    "low": [0.95, 1.05],
                    "high": [1.1, 1.25],
                    "volume": [10000, 12000]
                }],
                "adjclose": [{ "adjclose": [1.05, 1.2] }]
            },
            "events": {
                "dividends": { "200": { "amount": 0.07, "date": 200 } }
            }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert!(dataset.meta.dividends);
        assert_eq!(dataset.quote[&200].dividends_amount, Some(0.07));
        assert_eq!(dataset.quote[&100].dividends_amount, None);
    }

    #[test]
    fn dividend_without_amount_is_ignored() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "timestamp": [100],
            "indicators": {
                "quote": [{
                    "open": [1.0], "close": [1.05], "low": [0.95],
                    "high": [1.1], "volume": [10000]
                }],
                "adjclose": [{ "adjclose": [1.05] }]
            },
            "events": { "dividends": { "100": { "date": 100 } } }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert!(!dataset.meta.dividends);
        assert_eq!(dataset.quote[&100].dividends_amount, None);
    }

    #[test]
    fn missing_open_skips_record_but_advances_high_water_mark() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "timestamp": [100, 200, 300],
            "indicators": {
                "quote": [{
                    "open": [1.0, null, null],
                    "close": [1.05, 1.2, null],
                    "low": [0.95, 1.05, null],
                    "high": [1.1, 1.25, null],
                    "volume": [10000, 12000, null]
                }],
                "adjclose": [{ "adjclose": [1.05, 1.2, null] }]
            }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert_eq!(dataset.quote.len(), 1);
        assert!(dataset.quote.contains_key(&100));
        // last_updated reflects the final provider timestamp even though
        // that day emitted no record
        assert_eq!(dataset.last_updated, Some(300));
    }

    #[test]
    fn zero_open_is_treated_as_a_gap() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "timestamp": [100],
            "indicators": {
                "quote": [{
                    "open": [0.0], "close": [1.05], "low": [0.95],
                    "high": [1.1], "volume": [10000]
                }],
                "adjclose": [{ "adjclose": [1.05] }]
            }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert!(dataset.quote.is_empty());
        assert_eq!(dataset.last_updated, Some(100));
    }

    #[test]
    fn out_of_range_timestamp_is_skipped_without_panicking() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "timestamp": [100, 9999999999999999i64],
            "indicators": {
                "quote": [{
                    "open": [1.0, 1.1],
                    "close": [1.05, 1.2],
                    "low": [0.95, 1.05],
                    "high": [1.1, 1.25],
                    "volume": [10000, 12000]
                }],
                "adjclose": [{ "adjclose": [1.05, 1.2] }]
            }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert_eq!(dataset.quote.len(), 1);
        assert!(dataset.quote.contains_key(&100));
        // the high-water mark still follows the provider's last timestamp
        assert_eq!(dataset.last_updated, Some(9_999_999_999_999_999));
    }

    #[test]
    fn result_without_arrays_yields_meta_only_dataset() {
        let mut dates = DateCache::new();
        let result = chart(serde_json::json!({
            "meta": { "firstTradeDate": 100, "symbol": "ABC.AX" }
        }));

        let dataset = merge_chart(&result, &mut dates);
        assert!(dataset.quote.is_empty());
        assert_eq!(dataset.last_updated, None);
        assert_eq!(dataset.meta.first_trade_date, Some(100));
        assert!(!dataset.meta.dividends);
    }

    #[test]
    fn date_conversions_are_memoized_across_merges() {
        let mut dates = DateCache::new();
        merge_chart(&two_day_chart(), &mut dates);
        assert_eq!(dates.len(), 2);
        merge_chart(&two_day_chart(), &mut dates);
        assert_eq!(dates.len(), 2);
    }
}
