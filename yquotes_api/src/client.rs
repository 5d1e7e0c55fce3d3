//! HTTP client for the Yahoo Finance v8 chart endpoint.

use std::time::Duration;

use url::Url;

use crate::types::{ChartResponse, ChartResult};
use crate::FetchError;

/// Per-request timeout. The provider either answers quickly or not at
/// all; a slow response should fail fast rather than stall the batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Exchange suffix appended to every symbol (ASX listings).
const EXCHANGE_SUFFIX: &str = ".AX";

/// Client for daily chart data with dividend/split/capital-gain events.
///
/// Issues one GET per (symbol, window) in a fixed en-AU/AU locale
/// configuration. No retries; failure classification is left to the
/// returned [`FetchError`].
pub struct ChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChartClient {
    /// Creates a client pointing at the production chart endpoint.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str, period1: i64, period2: i64) -> Result<Url, FetchError> {
        let symbol = format!("{}{}", ticker.to_uppercase(), EXCHANGE_SUFFIX);
        let mut url = Url::parse(&format!("{}/v8/finance/chart/{}", self.base_url, symbol))
            .map_err(|e| {
                tracing::error!("Invalid chart URL constructed: {}", e);
                FetchError::Parse(format!("invalid URL: {}", e))
            })?;
        url.query_pairs_mut()
            .append_pair("events", "capitalGain|div|split")
            .append_pair("interval", "1d")
            .append_pair("lang", "en-AU")
            .append_pair("region", "AU")
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string());
        Ok(url)
    }

    /// Fetches daily chart data for the half-open window `[period1, period2)`.
    ///
    /// Returns `FetchError::Delisted` when the provider's error text says
    /// the symbol no longer trades; any other failure surfaces as a
    /// transport, status, or parse error.
    pub async fn get_chart(
        &self,
        ticker: &str,
        period1: i64,
        period2: i64,
    ) -> Result<ChartResult, FetchError> {
        let url = self.chart_url(ticker, period1, period2)?;

        let resp = self.client.get(url).send().await.map_err(|e| {
            tracing::error!(ticker, "Chart request failed: {}", e);
            FetchError::Transport(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!(ticker, "Failed to read chart response body: {}", e);
            FetchError::Transport(e)
        })?;

        if !status.is_success() {
            if body.to_lowercase().contains("delisted") {
                tracing::info!(ticker, "Symbol reported as delisted");
                return Err(FetchError::Delisted);
            }
            let snippet = truncate_body(&body);
            tracing::error!(ticker, "Chart request failed with status {}: {}", status, snippet);
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed: ChartResponse = serde_json::from_str(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!(ticker, "Failed to parse chart response: {} | body: {}", e, snippet);
            FetchError::Parse(format!("{}", e))
        })?;

        if let Some(err) = parsed.chart.error {
            if err.description.to_lowercase().contains("delisted") {
                tracing::info!(ticker, "Symbol reported as delisted");
                return Err(FetchError::Delisted);
            }
            // A provider-side error block on a 200 response leaves
            // nothing to merge for this ticker.
            tracing::warn!(ticker, "Provider error {}: {}", err.code, err.description);
            return Ok(ChartResult::default());
        }

        // A missing or empty result array is likewise an empty chart,
        // not a failure.
        Ok(parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .unwrap_or_default())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
