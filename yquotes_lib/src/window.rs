//! Fetch-window derivation for one ticker.

use chrono::{Duration, NaiveDate};

use crate::calendar::{day_start, DateCache};
use crate::dataset::TickerDataset;

/// What to do for a ticker this run: nothing, or fetch the half-open
/// window `[period1, period2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    Skip,
    Window { period1: i64, period2: i64 },
}

/// Derives the fetch window for a ticker from its stored dataset.
///
/// The default lookback is one day. A dataset whose `last_updated`
/// falls on today is already current and is skipped. A dataset whose
/// earliest quote does not sit on the instrument's `firstTradeDate` is
/// known incomplete at its early edge, so the window widens back to the
/// true first trade date to repair it.
pub fn plan_fetch(
    today: NaiveDate,
    existing: Option<&TickerDataset>,
    dates: &mut DateCache,
) -> FetchPlan {
    let period2 = day_start(today);
    let mut period1 = day_start(today - Duration::days(1));

    if let Some(dataset) = existing {
        if let Some(last_updated) = dataset.last_updated {
            // A last_updated outside the representable range is corrupt
            // stored data; ignore it and keep the default lookback.
            if let Some(last_sync_day) = dates.start_of_day(last_updated) {
                if last_sync_day == period2 {
                    return FetchPlan::Skip;
                }
                period1 = last_sync_day;
            }
        }

        if let (Some(first_trade), Some(first_quote)) =
            (dataset.meta.first_trade_date, dataset.first_quote())
        {
            if first_quote.timestamp != first_trade {
                period1 = first_trade;
            }
        }
    }

    if period1 == period2 {
        FetchPlan::Skip
    } else {
        FetchPlan::Window { period1, period2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetMeta, QuoteRecord, TickerDataset};
    use std::collections::BTreeMap;

    const DAY: i64 = 86_400;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn today_start() -> i64 {
        day_start(today())
    }

    fn dataset(last_updated: Option<i64>) -> TickerDataset {
        TickerDataset {
            meta: DatasetMeta::default(),
            quote: BTreeMap::new(),
            last_updated,
        }
    }

    fn with_quote(mut dataset: TickerDataset, timestamp: i64) -> TickerDataset {
        dataset.quote.insert(
            timestamp,
            QuoteRecord {
                timestamp,
                date: today(),
                open: 1.0,
                close: None,
                adjclose: None,
                low: None,
                high: None,
                volume: None,
                dividends_amount: None,
            },
        );
        dataset
    }

    #[test]
    fn absent_dataset_defaults_to_one_day_lookback() {
        let mut dates = DateCache::new();
        let plan = plan_fetch(today(), None, &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: today_start() - DAY,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn synced_today_skips() {
        let mut dates = DateCache::new();
        // last_updated mid-morning today still counts as synced today
        let existing = dataset(Some(today_start() + 3 * 3600));
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(plan, FetchPlan::Skip);
    }

    #[test]
    fn stale_dataset_resumes_from_last_sync_day() {
        let mut dates = DateCache::new();
        let existing = dataset(Some(today_start() - 3 * DAY + 7 * 3600));
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: today_start() - 3 * DAY,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn corrupt_last_updated_falls_back_to_default_window() {
        let mut dates = DateCache::new();
        let existing = dataset(Some(9_999_999_999_999_999));
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: today_start() - DAY,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn incomplete_early_edge_widens_to_first_trade_date() {
        let mut dates = DateCache::new();
        let mut existing = with_quote(dataset(Some(today_start() - DAY)), 500_000);
        existing.meta.first_trade_date = Some(100_000);
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: 100_000,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn complete_early_edge_keeps_default_window() {
        let mut dates = DateCache::new();
        let mut existing = with_quote(dataset(Some(today_start() - DAY)), 100_000);
        existing.meta.first_trade_date = Some(100_000);
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: today_start() - DAY,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn first_trade_date_without_quotes_is_ignored() {
        let mut dates = DateCache::new();
        let mut existing = dataset(Some(today_start() - DAY));
        existing.meta.first_trade_date = Some(100_000);
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(
            plan,
            FetchPlan::Window {
                period1: today_start() - DAY,
                period2: today_start(),
            }
        );
    }

    #[test]
    fn synced_today_skips_even_with_incomplete_edge() {
        // The freshness check runs first; an already-current dataset is
        // never widened.
        let mut dates = DateCache::new();
        let mut existing = with_quote(dataset(Some(today_start())), 500_000);
        existing.meta.first_trade_date = Some(100_000);
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(plan, FetchPlan::Skip);
    }

    #[test]
    fn equal_periods_skip() {
        // Widening can land period1 exactly on period2 (instrument whose
        // first trade date is today); the degenerate window is a skip.
        let mut dates = DateCache::new();
        let mut existing = with_quote(dataset(Some(today_start() - DAY)), 500_000);
        existing.meta.first_trade_date = Some(today_start());
        let plan = plan_fetch(today(), Some(&existing), &mut dates);
        assert_eq!(plan, FetchPlan::Skip);
    }
}
